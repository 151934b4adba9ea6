// ==========================================
// 手袋工厂生产追踪系统 - API 层
// ==========================================
// 职责: 对外暴露表单生命周期与报表查询接口
// 架构: API 层 → 引擎层 (纯计算) + 仓储层 (抽象数据访问)
// ==========================================

pub mod error;
pub mod form_api;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use form_api::{
    Actor, AddEntryRequest, CreateFormRequest, FormApi, FormDetail, FormListQuery,
    UpdateEntryRequest, UpdateFormRequest,
};
pub use report_api::{CompareRequest, ReportApi};
