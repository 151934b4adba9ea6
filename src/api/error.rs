// ==========================================
// 手袋工厂生产追踪系统 - API层错误类型
// ==========================================
// 职责: 定义领域错误分类, 转换仓储错误为用户可读的业务错误
// 红线: 每个前置条件失败都要说明失败的是哪条规则, 不得笼统报错
// 红线: 区分"业务规则拒绝"与"系统故障", 后者统一包装并保留原始信息
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("状态不允许该操作: {0}")]
    InvalidState(String),

    #[error("重复记录: {0}")]
    Duplicate(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 系统错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 把仓储层的技术错误落到领域错误分类上
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DuplicateKey(msg) => ApiError::Duplicate(msg),
            RepositoryError::StatusConflict {
                form_id,
                expected,
                actual,
            } => ApiError::InvalidState(format!(
                "表单{}状态已变化（期望{}，实际{}），操作未生效",
                form_id, expected, actual
            )),
            RepositoryError::StorageError(msg) => {
                ApiError::InternalError(format!("存储访问失败: {}", msg))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FormStatus;

    #[test]
    fn test_not_found_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "DigitalForm".to_string(),
            id: "F001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("DigitalForm"));
                assert!(msg.contains("F001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_status_conflict_maps_to_invalid_state() {
        let repo_err = RepositoryError::StatusConflict {
            form_id: "F001".to_string(),
            expected: FormStatus::Draft,
            actual: FormStatus::Pending,
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::InvalidState(msg) => {
                assert!(msg.contains("F001"));
                assert!(msg.contains("DRAFT"));
                assert!(msg.contains("PENDING"));
            }
            _ => panic!("Expected InvalidState"),
        }
    }

    #[test]
    fn test_storage_error_preserves_message() {
        // 系统故障包装为内部错误, 但原始信息必须保留
        let repo_err = RepositoryError::StorageError("connection reset".to_string());
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::InternalError(msg) => assert!(msg.contains("connection reset")),
            _ => panic!("Expected InternalError"),
        }
    }
}
