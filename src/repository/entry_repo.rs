// ==========================================
// 手袋工厂生产追踪系统 - 表单条目仓储 Trait
// ==========================================
// 职责: 定义表单条目数据访问接口 (不包含业务逻辑)
// 红线: Repository 不含业务规则, 只做数据 CRUD
// ==========================================

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::form::{EntryCombination, FormEntry};
use crate::domain::types::ShiftType;
use crate::repository::error::RepositoryResult;

// ==========================================
// FormEntryRepository Trait
// ==========================================
#[async_trait]
pub trait FormEntryRepository: Send + Sync {
    /// 插入条目
    async fn insert(&self, entry: &FormEntry) -> RepositoryResult<()>;

    /// 按ID查询条目
    async fn find_by_id(&self, entry_id: &str) -> RepositoryResult<Option<FormEntry>>;

    /// 查询某表单的全部条目
    async fn list_by_form(&self, form_id: &str) -> RepositoryResult<Vec<FormEntry>>;

    /// 统计某表单的条目数 (submit 前置校验用)
    async fn count_by_form(&self, form_id: &str) -> RepositoryResult<i64>;

    /// 按唯一组合查找条目
    ///
    /// # 返回
    /// - Ok(Some(entry)): 组合已存在
    /// - Ok(None): 组合未被占用
    async fn find_by_combination(
        &self,
        form_id: &str,
        combination: &EntryCombination,
    ) -> RepositoryResult<Option<FormEntry>>;

    /// 整体更新条目
    async fn update(&self, entry: &FormEntry) -> RepositoryResult<()>;

    /// 班次变更更新: 新时段映射与新班次一次写入
    async fn update_shift(
        &self,
        entry_id: &str,
        shift_type: ShiftType,
        hourly_data: BTreeMap<String, i32>,
        total_output: i32,
    ) -> RepositoryResult<FormEntry>;

    /// 删除条目
    async fn delete(&self, entry_id: &str) -> RepositoryResult<()>;

    /// 删除某表单的全部条目 (随表单删除级联)
    async fn delete_by_form(&self, form_id: &str) -> RepositoryResult<()>;

    // ===== 报表批量查询 =====

    /// 按表单ID集合批量取条目
    async fn list_by_form_ids(&self, form_ids: &[String]) -> RepositoryResult<Vec<FormEntry>>;

    /// 按小组 + 表单ID集合批量取条目
    /// (小组报表用: 只统计该小组成员的条目, 排除跨组借调工人)
    async fn list_by_group_and_form_ids(
        &self,
        group_id: &str,
        form_ids: &[String],
    ) -> RepositoryResult<Vec<FormEntry>>;
}
