// ==========================================
// 手袋工厂生产追踪系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use crate::domain::types::FormStatus;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("唯一约束违反: {0}")]
    DuplicateKey(String),

    // ===== 并发控制错误 =====
    // 条件更新失败: 表单状态与期望不符 (状态迁移的原子性保障点)
    #[error("状态冲突: form_id={form_id}, expected={expected}, actual={actual}")]
    StatusConflict {
        form_id: String,
        expected: FormStatus,
        actual: FormStatus,
    },

    // ===== 存储错误 =====
    #[error("存储访问失败: {0}")]
    StorageError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
