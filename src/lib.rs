// ==========================================
// 手袋工厂生产追踪系统 - 核心库
// ==========================================
// 系统定位: 数字表单工作流 + 层级聚合报表引擎
// 边界: HTTP 路由/鉴权/持久化/导出渲染 均为外部协作方
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问抽象
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 业务接口
pub mod api;

// 报表缓存抽象
pub mod cache;

// 配置层 - 注入式配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AttendanceStatus, ComparisonEntityKind, FormStatus, IssueType, OrgLevel, ShiftType, UserRole,
};

// 领域实体
pub use domain::{
    ComparisonReport, DigitalForm, EntryCombination, FormEntry, ProductionIssue, ProductionReport,
    ReportOptions,
};

// 引擎
pub use engine::{ComparisonAssembler, ReportAggregator};

// API
pub use api::{Actor, FormApi, ReportApi};

// 配置与缓存
pub use cache::{CacheTag, MemoryCache, ReportCache};
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "手袋工厂生产追踪系统";
