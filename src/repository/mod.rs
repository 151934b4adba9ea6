// ==========================================
// 手袋工厂生产追踪系统 - 数据仓储层
// ==========================================
// 职责: 定义数据访问接口, 屏蔽存储细节
// 红线: Repository 不含业务逻辑; 核心层只消费抽象, 不实现存储
// ==========================================

pub mod entry_repo;
pub mod error;
pub mod form_repo;
pub mod org_repo;
pub mod product_repo;

// 重导出核心仓储接口
pub use entry_repo::FormEntryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use form_repo::{
    FormListCondition, FormRepository, FormStatusPatch, OrgScopeFilter, Page, PagedResult,
};
pub use org_repo::{OrgDirectory, OrgUnitInfo, WorkerInfo};
pub use product_repo::{ProductDirectory, ProductInfo};
