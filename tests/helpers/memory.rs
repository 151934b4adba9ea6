// ==========================================
// 测试用内存仓储实现
// ==========================================
// 核心层只消费仓储抽象; 集成测试以内存实现充当存储协作方。
// 语义对齐真实存储: 条件状态迁移原子生效, 失败不落任何变更。
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use handbag_tracking::domain::form::{DigitalForm, EntryCombination, FormEntry};
use handbag_tracking::domain::types::{FormStatus, ShiftType};
use handbag_tracking::repository::entry_repo::FormEntryRepository;
use handbag_tracking::repository::error::{RepositoryError, RepositoryResult};
use handbag_tracking::repository::form_repo::{
    FormListCondition, FormRepository, FormStatusPatch, OrgScopeFilter, Page, PagedResult,
};
use handbag_tracking::repository::org_repo::{OrgDirectory, OrgUnitInfo, WorkerInfo};
use handbag_tracking::repository::product_repo::{ProductDirectory, ProductInfo};

// ==========================================
// MemoryFormRepository
// ==========================================
#[derive(Default)]
pub struct MemoryFormRepository {
    forms: Mutex<HashMap<String, DigitalForm>>,
}

impl MemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn insert(&self, form: &DigitalForm) -> RepositoryResult<()> {
        let mut forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        if forms.contains_key(&form.form_id) {
            return Err(RepositoryError::DuplicateKey(format!(
                "form_id={}",
                form.form_id
            )));
        }
        forms.insert(form.form_id.clone(), form.clone());
        Ok(())
    }

    async fn find_by_id(&self, form_id: &str) -> RepositoryResult<Option<DigitalForm>> {
        let forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        Ok(forms.get(form_id).cloned())
    }

    async fn update(&self, form: &DigitalForm) -> RepositoryResult<()> {
        let mut forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        match forms.get_mut(&form.form_id) {
            Some(slot) => {
                *slot = form.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity: "DigitalForm".to_string(),
                id: form.form_id.clone(),
            }),
        }
    }

    async fn delete(&self, form_id: &str) -> RepositoryResult<()> {
        let mut forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        forms
            .remove(form_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "DigitalForm".to_string(),
                id: form_id.to_string(),
            })
    }

    async fn list(
        &self,
        condition: &FormListCondition,
        page: Page,
    ) -> RepositoryResult<PagedResult<DigitalForm>> {
        let forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<DigitalForm> = forms
            .values()
            .filter(|form| {
                condition.status.map_or(true, |s| form.status == s)
                    && condition
                        .factory_id
                        .as_ref()
                        .map_or(true, |id| &form.factory_id == id)
                    && condition
                        .line_id
                        .as_ref()
                        .map_or(true, |id| &form.line_id == id)
                    && condition
                        .team_id
                        .as_ref()
                        .map_or(true, |id| &form.team_id == id)
                    && condition
                        .group_id
                        .as_ref()
                        .map_or(true, |id| &form.group_id == id)
                    && condition
                        .created_by
                        .as_ref()
                        .map_or(true, |id| &form.created_by == id)
                    && condition.date_from.map_or(true, |d| form.date >= d)
                    && condition.date_to.map_or(true, |d| form.date <= d)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.form_code.cmp(&b.form_code)));

        let total = matched.len() as u64;
        let offset = ((page.page.max(1) - 1) * page.page_size) as usize;
        let items = matched
            .into_iter()
            .skip(offset)
            .take(page.page_size as usize)
            .collect();
        Ok(PagedResult {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn transition_status(
        &self,
        form_id: &str,
        expected: FormStatus,
        patch: FormStatusPatch,
    ) -> RepositoryResult<DigitalForm> {
        let mut forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        let form = forms
            .get_mut(form_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "DigitalForm".to_string(),
                id: form_id.to_string(),
            })?;
        if form.status != expected {
            return Err(RepositoryError::StatusConflict {
                form_id: form_id.to_string(),
                expected,
                actual: form.status,
            });
        }

        // 状态与关联字段一次生效
        if let Some(status) = patch.status {
            form.status = status;
        }
        if let Some(submitted_at) = patch.submitted_at {
            form.submitted_at = Some(submitted_at);
        }
        if let Some(approved_at) = patch.approved_at {
            form.approved_at = Some(approved_at);
        }
        if let Some(approval_request_id) = patch.approval_request_id {
            form.approval_request_id = Some(approval_request_id);
        }
        if let Some(is_exported) = patch.is_exported {
            form.is_exported = is_exported;
        }
        if let Some(updated_by) = patch.updated_by {
            form.updated_by = Some(updated_by);
        }
        if let Some(updated_at) = patch.updated_at {
            form.updated_at = updated_at;
        }
        Ok(form.clone())
    }

    async fn list_by_scope_and_range(
        &self,
        scope: &OrgScopeFilter,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> RepositoryResult<Vec<DigitalForm>> {
        let forms = self.forms.lock().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<DigitalForm> = forms
            .values()
            .filter(|form| form.date >= date_from && form.date <= date_to)
            .filter(|form| match scope {
                OrgScopeFilter::Factory(id) => &form.factory_id == id,
                OrgScopeFilter::Line(id) => &form.line_id == id,
                OrgScopeFilter::Team(id) => &form.team_id == id,
                OrgScopeFilter::Group(id) => &form.group_id == id,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.form_id.cmp(&b.form_id)));
        Ok(matched)
    }
}

// ==========================================
// MemoryEntryRepository
// ==========================================
#[derive(Default)]
pub struct MemoryEntryRepository {
    entries: Mutex<HashMap<String, FormEntry>>,
    // 小组ID → 成员工人ID集合 (list_by_group_and_form_ids 过滤用)
    group_members: Mutex<HashMap<String, HashSet<String>>>,
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_group_members(&self, group_id: &str, members: &[&str]) {
        let mut groups = self.group_members.lock().unwrap_or_else(|e| e.into_inner());
        groups.insert(
            group_id.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
    }
}

#[async_trait]
impl FormEntryRepository for MemoryEntryRepository {
    async fn insert(&self, entry: &FormEntry) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.contains_key(&entry.entry_id) {
            return Err(RepositoryError::DuplicateKey(format!(
                "entry_id={}",
                entry.entry_id
            )));
        }
        entries.insert(entry.entry_id.clone(), entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, entry_id: &str) -> RepositoryResult<Option<FormEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(entry_id).cloned())
    }

    async fn list_by_form(&self, form_id: &str) -> RepositoryResult<Vec<FormEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<FormEntry> = entries
            .values()
            .filter(|e| e.form_id == form_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.entry_id.cmp(&b.entry_id));
        Ok(matched)
    }

    async fn count_by_form(&self, form_id: &str) -> RepositoryResult<i64> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.values().filter(|e| e.form_id == form_id).count() as i64)
    }

    async fn find_by_combination(
        &self,
        form_id: &str,
        combination: &EntryCombination,
    ) -> RepositoryResult<Option<FormEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .values()
            .find(|e| e.form_id == form_id && &e.combination() == combination)
            .cloned())
    }

    async fn update(&self, entry: &FormEntry) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(&entry.entry_id) {
            Some(slot) => {
                *slot = entry.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity: "FormEntry".to_string(),
                id: entry.entry_id.clone(),
            }),
        }
    }

    async fn update_shift(
        &self,
        entry_id: &str,
        shift_type: ShiftType,
        hourly_data: BTreeMap<String, i32>,
        total_output: i32,
    ) -> RepositoryResult<FormEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .get_mut(entry_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "FormEntry".to_string(),
                id: entry_id.to_string(),
            })?;
        // 新班次与新时段映射一次写入
        entry.shift_type = shift_type;
        entry.hourly_data = hourly_data;
        entry.total_output = total_output;
        Ok(entry.clone())
    }

    async fn delete(&self, entry_id: &str) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .remove(entry_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "FormEntry".to_string(),
                id: entry_id.to_string(),
            })
    }

    async fn delete_by_form(&self, form_id: &str) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, e| e.form_id != form_id);
        Ok(())
    }

    async fn list_by_form_ids(&self, form_ids: &[String]) -> RepositoryResult<Vec<FormEntry>> {
        let wanted: HashSet<&String> = form_ids.iter().collect();
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<FormEntry> = entries
            .values()
            .filter(|e| wanted.contains(&e.form_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.entry_id.cmp(&b.entry_id));
        Ok(matched)
    }

    async fn list_by_group_and_form_ids(
        &self,
        group_id: &str,
        form_ids: &[String],
    ) -> RepositoryResult<Vec<FormEntry>> {
        let members = {
            let groups = self.group_members.lock().unwrap_or_else(|e| e.into_inner());
            groups.get(group_id).cloned().unwrap_or_default()
        };
        let all = self.list_by_form_ids(form_ids).await?;
        Ok(all
            .into_iter()
            .filter(|e| members.contains(&e.user_id))
            .collect())
    }
}

// ==========================================
// MemoryOrgDirectory
// ==========================================
#[derive(Default)]
pub struct MemoryOrgDirectory {
    factories: HashMap<String, OrgUnitInfo>,
    lines: HashMap<String, OrgUnitInfo>,
    teams: HashMap<String, OrgUnitInfo>,
    groups: HashMap<String, OrgUnitInfo>,
    lines_of_factory: HashMap<String, Vec<String>>,
    teams_of_line: HashMap<String, Vec<String>>,
    groups_of_team: HashMap<String, Vec<String>>,
    workers_of_group: HashMap<String, Vec<WorkerInfo>>,
}

impl MemoryOrgDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn unit(id: &str, code: &str, name: &str) -> OrgUnitInfo {
        OrgUnitInfo {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    pub fn add_factory(&mut self, id: &str, code: &str, name: &str) {
        self.factories.insert(id.to_string(), Self::unit(id, code, name));
    }

    pub fn add_line(&mut self, factory_id: &str, id: &str, code: &str, name: &str) {
        self.lines.insert(id.to_string(), Self::unit(id, code, name));
        self.lines_of_factory
            .entry(factory_id.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn add_team(&mut self, line_id: &str, id: &str, code: &str, name: &str) {
        self.teams.insert(id.to_string(), Self::unit(id, code, name));
        self.teams_of_line
            .entry(line_id.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn add_group(&mut self, team_id: &str, id: &str, code: &str, name: &str) {
        self.groups.insert(id.to_string(), Self::unit(id, code, name));
        self.groups_of_team
            .entry(team_id.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn add_worker(&mut self, group_id: &str, user_id: &str, code: &str, name: &str) {
        self.workers_of_group
            .entry(group_id.to_string())
            .or_default()
            .push(WorkerInfo {
                user_id: user_id.to_string(),
                employee_code: code.to_string(),
                full_name: name.to_string(),
            });
    }

    fn children(units: &HashMap<String, OrgUnitInfo>, ids: Option<&Vec<String>>) -> Vec<OrgUnitInfo> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| units.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
    }
}

#[async_trait]
impl OrgDirectory for MemoryOrgDirectory {
    async fn factory_info(&self, factory_id: &str) -> RepositoryResult<Option<OrgUnitInfo>> {
        Ok(self.factories.get(factory_id).cloned())
    }

    async fn line_info(&self, line_id: &str) -> RepositoryResult<Option<OrgUnitInfo>> {
        Ok(self.lines.get(line_id).cloned())
    }

    async fn team_info(&self, team_id: &str) -> RepositoryResult<Option<OrgUnitInfo>> {
        Ok(self.teams.get(team_id).cloned())
    }

    async fn group_info(&self, group_id: &str) -> RepositoryResult<Option<OrgUnitInfo>> {
        Ok(self.groups.get(group_id).cloned())
    }

    async fn lines_of_factory(&self, factory_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>> {
        Ok(Self::children(
            &self.lines,
            self.lines_of_factory.get(factory_id),
        ))
    }

    async fn teams_of_line(&self, line_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>> {
        Ok(Self::children(&self.teams, self.teams_of_line.get(line_id)))
    }

    async fn groups_of_team(&self, team_id: &str) -> RepositoryResult<Vec<OrgUnitInfo>> {
        Ok(Self::children(
            &self.groups,
            self.groups_of_team.get(team_id),
        ))
    }

    async fn workers_of_group(&self, group_id: &str) -> RepositoryResult<Vec<WorkerInfo>> {
        Ok(self
            .workers_of_group
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ==========================================
// MemoryProductDirectory
// ==========================================
#[derive(Default)]
pub struct MemoryProductDirectory {
    handbags: HashMap<String, ProductInfo>,
    processes: HashMap<String, ProductInfo>,
}

impl MemoryProductDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handbag(&mut self, id: &str, code: &str, name: &str) {
        self.handbags.insert(
            id.to_string(),
            ProductInfo {
                id: id.to_string(),
                code: code.to_string(),
                name: name.to_string(),
            },
        );
    }

    pub fn add_process(&mut self, id: &str, code: &str, name: &str) {
        self.processes.insert(
            id.to_string(),
            ProductInfo {
                id: id.to_string(),
                code: code.to_string(),
                name: name.to_string(),
            },
        );
    }
}

#[async_trait]
impl ProductDirectory for MemoryProductDirectory {
    async fn handbags_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<ProductInfo>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.handbags.get(id).cloned())
            .collect())
    }

    async fn processes_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<ProductInfo>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.processes.get(id).cloned())
            .collect())
    }
}
