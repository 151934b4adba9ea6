// ==========================================
// 手袋工厂生产追踪系统 - 组织目录仓储 Trait
// ==========================================
// 职责: 组织层级 (工厂/产线/班组/小组/工人) 的只读查询
// 用途: 表单编码生成、报表范围解析、递归上卷的下级枚举
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repository::error::RepositoryResult;

// ==========================================
// 查询结果类型
// ==========================================

/// 组织单元信息 (工厂/产线/班组/小组通用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgUnitInfo {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// 工人信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub user_id: String,
    pub employee_code: String,
    pub full_name: String,
}

// ==========================================
// OrgDirectory Trait
// ==========================================
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    // ===== 单元信息查询 =====

    /// 查询工厂信息
    async fn factory_info(&self, factory_id: &str) -> RepositoryResult<Option<OrgUnitInfo>>;

    /// 查询产线信息
    async fn line_info(&self, line_id: &str) -> RepositoryResult<Option<OrgUnitInfo>>;

    /// 查询班组信息
    async fn team_info(&self, team_id: &str) -> RepositoryResult<Option<OrgUnitInfo>>;

    /// 查询小组信息
    async fn group_info(&self, group_id: &str) -> RepositoryResult<Option<OrgUnitInfo>>;

    // ===== 下级枚举 =====

    /// 工厂下的产线列表
    async fn lines_of_factory(&self, factory_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>>;

    /// 产线下的班组列表
    async fn teams_of_line(&self, line_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>>;

    /// 班组下的小组列表
    async fn groups_of_team(&self, team_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>>;

    /// 小组下的工人列表
    async fn workers_of_group(&self, group_id: &str) -> RepositoryResult<Vec<WorkerInfo>>;
}
