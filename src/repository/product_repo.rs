// ==========================================
// 手袋工厂生产追踪系统 - 产品目录仓储 Trait
// ==========================================
// 职责: 手袋 / 工序 的编码与名称批量查询
// 用途: 报表分解行挂接人类可读的编码/名称
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repository::error::RepositoryResult;

/// 产品/工序信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: String,
    pub code: String,
    pub name: String,
}

// ==========================================
// ProductDirectory Trait
// ==========================================
#[async_trait]
pub trait ProductDirectory: Send + Sync {
    /// 按ID列表批量查询手袋信息
    async fn handbags_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<ProductInfo>>;

    /// 按ID列表批量查询工序信息
    async fn processes_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<ProductInfo>>;
}
