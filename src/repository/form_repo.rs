// ==========================================
// 手袋工厂生产追踪系统 - 表单仓储 Trait
// ==========================================
// 职责: 定义表单数据访问接口 (不包含业务逻辑)
// 红线: Repository 不含业务规则, 只做数据 CRUD
// 红线: 状态迁移必须是单次条件更新 (检查当前状态 + 写入新状态为一个原子操作)
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::form::DigitalForm;
use crate::domain::types::FormStatus;
use crate::repository::error::RepositoryResult;

// ==========================================
// 查询条件与分页
// ==========================================

/// 表单列表查询条件 (全部可选, 组合过滤)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormListCondition {
    pub status: Option<FormStatus>,
    pub factory_id: Option<String>,
    pub line_id: Option<String>,
    pub team_id: Option<String>,
    pub group_id: Option<String>,
    pub created_by: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// 分页参数 (页码从 1 起)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// 报表范围过滤 (层级互斥: 只按其中一个单元ID过滤)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrgScopeFilter {
    Factory(String),
    Line(String),
    Team(String),
    Group(String),
}

// ==========================================
// 状态迁移补丁
// ==========================================
// 状态与相关时间戳字段一次写入, 失败不落任何部分变更
#[derive(Debug, Clone, Default)]
pub struct FormStatusPatch {
    pub status: Option<FormStatus>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approval_request_id: Option<String>,
    pub is_exported: Option<bool>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==========================================
// FormRepository Trait
// ==========================================
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// 插入表单
    async fn insert(&self, form: &DigitalForm) -> RepositoryResult<()>;

    /// 按ID查询表单
    ///
    /// # 返回
    /// - Ok(Some(form)): 找到
    /// - Ok(None): 未找到
    async fn find_by_id(&self, form_id: &str) -> RepositoryResult<Option<DigitalForm>>;

    /// 整体更新表单 (仅草稿期内容编辑使用)
    async fn update(&self, form: &DigitalForm) -> RepositoryResult<()>;

    /// 删除表单
    async fn delete(&self, form_id: &str) -> RepositoryResult<()>;

    /// 条件分页查询
    async fn list(
        &self,
        condition: &FormListCondition,
        page: Page,
    ) -> RepositoryResult<PagedResult<DigitalForm>>;

    /// 条件状态迁移 (原子的读-改-写)
    ///
    /// # 参数
    /// - form_id: 表单ID
    /// - expected: 期望的当前状态
    /// - patch: 状态及关联字段补丁
    ///
    /// # 返回
    /// - Ok(form): 迁移后的表单
    /// - Err(StatusConflict): 当前状态与期望不符 (并发迁移时至多一个成功)
    /// - Err(NotFound): 表单不存在
    async fn transition_status(
        &self,
        form_id: &str,
        expected: FormStatus,
        patch: FormStatusPatch,
    ) -> RepositoryResult<DigitalForm>;

    /// 报表批量查询: 按组织范围和日期区间取表单
    async fn list_by_scope_and_range(
        &self,
        scope: &OrgScopeFilter,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> RepositoryResult<Vec<DigitalForm>>;
}
