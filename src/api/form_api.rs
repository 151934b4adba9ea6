// ==========================================
// 手袋工厂生产追踪系统 - 数字表单 API
// ==========================================
// 职责: 表单生命周期状态机 + 表单条目管理
// 状态机: DRAFT → PENDING → {CONFIRMED, REJECTED}
// 权限规则: 创建人或管理员可 改/删/提交; 审批/驳回仅管理员
// 红线: 表单离开 DRAFT 后, 条目一律不可增删改 (防止事后篡改)
// 红线: 状态迁移走仓储层的条件更新, 并发提交至多一个成功
// ==========================================

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::cache::{CacheTag, ReportCache};
use crate::config::AppConfig;
use crate::domain::form::{DigitalForm, EntryCombination, FormEntry, ProductionIssue};
use crate::domain::types::{AttendanceStatus, FormStatus, ShiftType, UserRole};
use crate::engine::time_slot;
use crate::repository::entry_repo::FormEntryRepository;
use crate::repository::form_repo::{
    FormListCondition, FormRepository, FormStatusPatch, Page, PagedResult,
};
use crate::repository::org_repo::OrgDirectory;

// ==========================================
// 请求者与请求类型
// ==========================================

/// 请求者 (已由边界层鉴权, 核心层只消费角色)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// 创建表单请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFormRequest {
    pub form_name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub factory_id: String,
    pub line_id: String,
    pub team_id: String,
    pub group_id: String,
    pub worker_id: Option<String>,
}

/// 更新表单请求 (None 表示不改)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFormRequest {
    pub form_name: Option<String>,
    pub description: Option<String>,
}

/// 表单列表查询
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormListQuery {
    pub status: Option<FormStatus>,
    pub factory_id: Option<String>,
    pub line_id: Option<String>,
    pub team_id: Option<String>,
    pub group_id: Option<String>,
    pub created_by: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: u32,
    pub page_size: u32,
}

/// 表单详情 (表单 + 条目)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDetail {
    pub form: DigitalForm,
    pub entries: Vec<FormEntry>,
}

/// 新增条目请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub user_id: String,
    pub handbag_id: String,
    pub bag_color_id: String,
    pub process_id: String,
    pub planned_output: i32,
    /// 为空时按条目班次播种全零时段
    pub hourly_data: Option<BTreeMap<String, i32>>,
    /// 显式覆盖总产量 (缺省为时段求和)
    pub total_output: Option<i32>,
    pub attendance_status: AttendanceStatus,
    /// 缺省沿用表单班次
    pub shift_type: Option<ShiftType>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub attendance_note: Option<String>,
    pub issues: Vec<ProductionIssue>,
    pub quality_score: i32,
    pub quality_notes: Option<String>,
}

/// 更新条目请求 (None 表示不改; hourly_data 为部分补丁, 只覆盖给出的键)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub handbag_id: Option<String>,
    pub bag_color_id: Option<String>,
    pub process_id: Option<String>,
    pub planned_output: Option<i32>,
    pub hourly_data: Option<BTreeMap<String, i32>>,
    /// 仅在时段数据未变时生效 (显式覆盖)
    pub total_output: Option<i32>,
    pub attendance_status: Option<AttendanceStatus>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub attendance_note: Option<String>,
    pub issues: Option<Vec<ProductionIssue>>,
    pub quality_score: Option<i32>,
    pub quality_notes: Option<String>,
}

// ==========================================
// FormApi - 数字表单 API
// ==========================================
pub struct FormApi {
    form_repo: Arc<dyn FormRepository>,
    entry_repo: Arc<dyn FormEntryRepository>,
    org_repo: Arc<dyn OrgDirectory>,
    cache: Arc<dyn ReportCache>,
    config: AppConfig,
}

impl FormApi {
    /// 创建新的 FormApi 实例
    pub fn new(
        form_repo: Arc<dyn FormRepository>,
        entry_repo: Arc<dyn FormEntryRepository>,
        org_repo: Arc<dyn OrgDirectory>,
        cache: Arc<dyn ReportCache>,
        config: AppConfig,
    ) -> Self {
        Self {
            form_repo,
            entry_repo,
            org_repo,
            cache,
            config,
        }
    }

    // ==========================================
    // 表单生命周期
    // ==========================================

    /// 创建表单 (角色: 组长/线长/管理员/超级管理员)
    #[instrument(skip(self, request), fields(creator = %actor.user_id))]
    pub async fn create_form(
        &self,
        actor: &Actor,
        request: CreateFormRequest,
    ) -> ApiResult<DigitalForm> {
        if !actor.role.can_create_form() {
            return Err(ApiError::PermissionDenied(format!(
                "角色{}不允许创建表单",
                actor.role
            )));
        }
        if request.form_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("表单名称不能为空".to_string()));
        }

        let form_code = self
            .generate_form_code(
                request.date,
                &request.factory_id,
                &request.line_id,
                &request.team_id,
                &request.group_id,
                request.shift_type,
            )
            .await?;

        let now = Utc::now();
        let form = DigitalForm {
            form_id: Uuid::new_v4().to_string(),
            form_code,
            form_name: request.form_name,
            description: request.description,
            date: request.date,
            shift_type: request.shift_type,
            factory_id: request.factory_id,
            line_id: request.line_id,
            team_id: request.team_id,
            group_id: request.group_id,
            worker_id: request.worker_id,
            status: FormStatus::Draft,
            created_by: actor.user_id.clone(),
            updated_by: None,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            approved_at: None,
            approval_request_id: None,
            is_exported: false,
            is_synced: false,
        };

        self.form_repo.insert(&form).await?;
        self.invalidate_caches().await;
        info!(form_id = %form.form_id, form_code = %form.form_code, "表单已创建");
        Ok(form)
    }

    /// 查询表单详情 (表单 + 条目)
    pub async fn get_form(&self, form_id: &str) -> ApiResult<FormDetail> {
        let form = self.load_form(form_id).await?;
        let entries = self.entry_repo.list_by_form(form_id).await?;
        Ok(FormDetail { form, entries })
    }

    /// 条件分页查询表单
    pub async fn list_forms(&self, query: FormListQuery) -> ApiResult<PagedResult<DigitalForm>> {
        if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
            if from > to {
                return Err(ApiError::InvalidInput(format!(
                    "日期区间无效: {} 晚于 {}",
                    from, to
                )));
            }
        }

        let condition = FormListCondition {
            status: query.status,
            factory_id: query.factory_id,
            line_id: query.line_id,
            team_id: query.team_id,
            group_id: query.group_id,
            created_by: query.created_by,
            date_from: query.date_from,
            date_to: query.date_to,
        };
        let page = Page {
            page: query.page.max(1),
            page_size: self.config.clamp_page_size(query.page_size),
        };

        Ok(self.form_repo.list(&condition, page).await?)
    }

    /// 更新表单基础信息 (仅草稿, 创建人或管理员)
    #[instrument(skip(self, request), fields(form_id = %form_id))]
    pub async fn update_form(
        &self,
        actor: &Actor,
        form_id: &str,
        request: UpdateFormRequest,
    ) -> ApiResult<DigitalForm> {
        let mut form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "修改")?;
        self.ensure_draft(&form, "修改")?;

        if let Some(name) = request.form_name {
            if name.trim().is_empty() {
                return Err(ApiError::InvalidInput("表单名称不能为空".to_string()));
            }
            form.form_name = name;
        }
        if let Some(description) = request.description {
            form.description = Some(description);
        }
        form.updated_by = Some(actor.user_id.clone());
        form.updated_at = Utc::now();

        self.form_repo.update(&form).await?;
        self.invalidate_caches().await;
        Ok(form)
    }

    /// 删除表单 (仅草稿, 创建人或管理员; 条目级联删除)
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn delete_form(&self, actor: &Actor, form_id: &str) -> ApiResult<()> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "删除")?;
        self.ensure_draft(&form, "删除")?;

        self.entry_repo.delete_by_form(form_id).await?;
        self.form_repo.delete(form_id).await?;
        self.invalidate_caches().await;
        info!(form_id = %form_id, "表单已删除");
        Ok(())
    }

    /// 提交表单 (DRAFT → PENDING)
    ///
    /// 前置条件: 创建人或管理员; 至少一条条目。
    /// 提交时间与外部审批请求ID随状态一次写入。
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn submit_form(
        &self,
        actor: &Actor,
        form_id: &str,
        approval_request_id: Option<String>,
    ) -> ApiResult<DigitalForm> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "提交")?;

        match form.status {
            FormStatus::Draft => {}
            FormStatus::Pending => {
                return Err(ApiError::InvalidState(
                    "表单已提交, 不能重复提交".to_string(),
                ))
            }
            FormStatus::Confirmed | FormStatus::Rejected => {
                return Err(ApiError::InvalidState(
                    "表单已审结, 不能再提交".to_string(),
                ))
            }
        }

        let entry_count = self.entry_repo.count_by_form(form_id).await?;
        if entry_count == 0 {
            return Err(ApiError::InvalidState(
                "表单没有条目, 不能提交".to_string(),
            ));
        }

        let now = Utc::now();
        let patch = FormStatusPatch {
            status: Some(FormStatus::Pending),
            submitted_at: Some(now),
            approval_request_id,
            updated_by: Some(actor.user_id.clone()),
            updated_at: Some(now),
            ..FormStatusPatch::default()
        };
        let form = self
            .form_repo
            .transition_status(form_id, FormStatus::Draft, patch)
            .await?;
        self.invalidate_caches().await;
        info!(form_id = %form_id, entry_count, "表单已提交");
        Ok(form)
    }

    /// 审批通过 (PENDING → CONFIRMED, 仅管理员)
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn approve_form(&self, actor: &Actor, form_id: &str) -> ApiResult<DigitalForm> {
        self.ensure_admin_tier(actor, "审批")?;
        let form = self.load_form(form_id).await?;
        if !form.is_pending() {
            return Err(ApiError::InvalidState(
                "只有待审核状态的表单才能审批".to_string(),
            ));
        }

        let now = Utc::now();
        let patch = FormStatusPatch {
            status: Some(FormStatus::Confirmed),
            approved_at: Some(now),
            updated_by: Some(actor.user_id.clone()),
            updated_at: Some(now),
            ..FormStatusPatch::default()
        };
        let form = self
            .form_repo
            .transition_status(form_id, FormStatus::Pending, patch)
            .await?;
        self.invalidate_caches().await;
        info!(form_id = %form_id, approver = %actor.user_id, "表单已确认");
        Ok(form)
    }

    /// 驳回 (PENDING → REJECTED, 仅管理员)
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn reject_form(&self, actor: &Actor, form_id: &str) -> ApiResult<DigitalForm> {
        self.ensure_admin_tier(actor, "驳回")?;
        let form = self.load_form(form_id).await?;
        if !form.is_pending() {
            return Err(ApiError::InvalidState(
                "只有待审核状态的表单才能驳回".to_string(),
            ));
        }

        let now = Utc::now();
        let patch = FormStatusPatch {
            status: Some(FormStatus::Rejected),
            updated_by: Some(actor.user_id.clone()),
            updated_at: Some(now),
            ..FormStatusPatch::default()
        };
        let form = self
            .form_repo
            .transition_status(form_id, FormStatus::Pending, patch)
            .await?;
        self.invalidate_caches().await;
        info!(form_id = %form_id, reviewer = %actor.user_id, "表单已驳回");
        Ok(form)
    }

    /// 外部审批回调
    ///
    /// 外部审批流 (approval_request_id 指向的系统) 回报结果时,
    /// 以配置注入的系统账号身份落地审批/驳回。
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn apply_approval_callback(
        &self,
        form_id: &str,
        approved: bool,
    ) -> ApiResult<DigitalForm> {
        let form = self.load_form(form_id).await?;
        if form.approval_request_id.is_none() {
            return Err(ApiError::InvalidState(
                "表单未关联外部审批请求, 不接受回调".to_string(),
            ));
        }

        let system_actor = Actor::new(self.config.system_account_id.clone(), UserRole::SuperAdmin);
        if approved {
            self.approve_form(&system_actor, form_id).await
        } else {
            self.reject_form(&system_actor, form_id).await
        }
    }

    /// 标记已导出 (仅管理员, 仅已确认表单)
    #[instrument(skip(self), fields(form_id = %form_id))]
    pub async fn mark_exported(&self, actor: &Actor, form_id: &str) -> ApiResult<DigitalForm> {
        self.ensure_admin_tier(actor, "标记导出")?;
        let form = self.load_form(form_id).await?;
        if form.status != FormStatus::Confirmed {
            return Err(ApiError::InvalidState(
                "只有已确认的表单才能标记导出".to_string(),
            ));
        }

        let patch = FormStatusPatch {
            is_exported: Some(true),
            updated_by: Some(actor.user_id.clone()),
            updated_at: Some(Utc::now()),
            ..FormStatusPatch::default()
        };
        let form = self
            .form_repo
            .transition_status(form_id, FormStatus::Confirmed, patch)
            .await?;
        self.invalidate_caches().await;
        Ok(form)
    }

    // ==========================================
    // 表单条目管理
    // ==========================================

    /// 新增条目 (仅草稿; 组合键查重; 空时段播种全零)
    #[instrument(skip(self, request), fields(form_id = %form_id))]
    pub async fn add_entry(
        &self,
        actor: &Actor,
        form_id: &str,
        request: AddEntryRequest,
    ) -> ApiResult<FormEntry> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "编辑条目")?;
        self.ensure_draft(&form, "编辑条目")?;

        let shift_type = request.shift_type.unwrap_or(form.shift_type);
        Self::validate_quality_score(request.quality_score)?;
        Self::validate_issues(&request.issues, shift_type)?;

        let combination = EntryCombination {
            user_id: request.user_id.clone(),
            handbag_id: request.handbag_id.clone(),
            bag_color_id: request.bag_color_id.clone(),
            process_id: request.process_id.clone(),
        };
        if self
            .entry_repo
            .find_by_combination(form_id, &combination)
            .await?
            .is_some()
        {
            return Err(ApiError::Duplicate(
                "同一表单中已存在相同的 工人+手袋+颜色+工序 组合".to_string(),
            ));
        }

        // 空时段按班次播种全零; 非空时段校验标签属于该班次
        let hourly_data = match request.hourly_data {
            Some(data) if !data.is_empty() => {
                Self::validate_slot_labels(&data, shift_type)?;
                let mut slots = time_slot::empty_slots(shift_type);
                for (label, value) in data {
                    slots.insert(label, value);
                }
                slots
            }
            _ => time_slot::empty_slots(shift_type),
        };
        let hourly_sum: i32 = hourly_data.values().sum();
        let total_output = request.total_output.unwrap_or(hourly_sum);

        let now = Utc::now();
        let entry = FormEntry {
            entry_id: Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            user_id: request.user_id,
            handbag_id: request.handbag_id,
            bag_color_id: request.bag_color_id,
            process_id: request.process_id,
            planned_output: request.planned_output,
            hourly_data,
            total_output,
            attendance_status: request.attendance_status,
            shift_type,
            check_in_time: request.check_in_time,
            check_out_time: request.check_out_time,
            attendance_note: request.attendance_note,
            issues: request.issues,
            quality_score: request.quality_score,
            quality_notes: request.quality_notes,
            created_at: now,
            updated_at: now,
        };

        self.entry_repo.insert(&entry).await?;
        self.invalidate_caches().await;
        Ok(entry)
    }

    /// 更新条目 (仅草稿)
    ///
    /// 时段补丁只覆盖给出的键; 时段变化时总产量重算为求和,
    /// 否则接受显式给出的总产量。组合变化重查唯一性。
    #[instrument(skip(self, request), fields(form_id = %form_id, entry_id = %entry_id))]
    pub async fn update_entry(
        &self,
        actor: &Actor,
        form_id: &str,
        entry_id: &str,
        request: UpdateEntryRequest,
    ) -> ApiResult<FormEntry> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "编辑条目")?;
        self.ensure_draft(&form, "编辑条目")?;
        let mut entry = self.load_entry(form_id, entry_id).await?;

        // 组合变化重查唯一性
        let new_combination = EntryCombination {
            user_id: entry.user_id.clone(),
            handbag_id: request
                .handbag_id
                .clone()
                .unwrap_or_else(|| entry.handbag_id.clone()),
            bag_color_id: request
                .bag_color_id
                .clone()
                .unwrap_or_else(|| entry.bag_color_id.clone()),
            process_id: request
                .process_id
                .clone()
                .unwrap_or_else(|| entry.process_id.clone()),
        };
        if new_combination != entry.combination() {
            if let Some(existing) = self
                .entry_repo
                .find_by_combination(form_id, &new_combination)
                .await?
            {
                if existing.entry_id != entry.entry_id {
                    return Err(ApiError::Duplicate(
                        "同一表单中已存在相同的 工人+手袋+颜色+工序 组合".to_string(),
                    ));
                }
            }
            entry.handbag_id = new_combination.handbag_id;
            entry.bag_color_id = new_combination.bag_color_id;
            entry.process_id = new_combination.process_id;
        }

        if let Some(planned) = request.planned_output {
            entry.planned_output = planned;
        }

        // 时段补丁合并
        match request.hourly_data {
            Some(patch) if !patch.is_empty() => {
                Self::validate_slot_labels(&patch, entry.shift_type)?;
                for (label, value) in patch {
                    entry.hourly_data.insert(label, value);
                }
                entry.total_output = entry.hourly_sum();
            }
            _ => {
                if let Some(total) = request.total_output {
                    entry.total_output = total;
                }
            }
        }

        if let Some(status) = request.attendance_status {
            entry.attendance_status = status;
        }
        if let Some(check_in) = request.check_in_time {
            entry.check_in_time = Some(check_in);
        }
        if let Some(check_out) = request.check_out_time {
            entry.check_out_time = Some(check_out);
        }
        if let Some(note) = request.attendance_note {
            entry.attendance_note = Some(note);
        }
        if let Some(issues) = request.issues {
            Self::validate_issues(&issues, entry.shift_type)?;
            entry.issues = issues;
        }
        if let Some(score) = request.quality_score {
            Self::validate_quality_score(score)?;
            entry.quality_score = score;
        }
        if let Some(notes) = request.quality_notes {
            entry.quality_notes = Some(notes);
        }
        entry.updated_at = Utc::now();

        self.entry_repo.update(&entry).await?;
        self.invalidate_caches().await;
        Ok(entry)
    }

    /// 变更条目班次 (时段集合扩缩, 新映射与新班次一次写入)
    ///
    /// 收窄班次会丢弃超出目标班次的时段; 其中存在非零产量时,
    /// 必须由调用方显式传 allow_data_loss 放行, 否则拒绝。
    #[instrument(skip(self), fields(form_id = %form_id, entry_id = %entry_id))]
    pub async fn change_entry_shift(
        &self,
        actor: &Actor,
        form_id: &str,
        entry_id: &str,
        shift_type: ShiftType,
        allow_data_loss: bool,
    ) -> ApiResult<FormEntry> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "编辑条目")?;
        self.ensure_draft(&form, "编辑条目")?;
        let entry = self.load_entry(form_id, entry_id).await?;

        let expansion = time_slot::expand_slots_for_shift(&entry.hourly_data, shift_type);
        if expansion.has_data_loss() && !allow_data_loss {
            let slots: Vec<String> = expansion
                .dropped
                .iter()
                .map(|d| format!("{}({})", d.label, d.output))
                .collect();
            let dropped = slots.join(", ");
            warn!(entry_id = %entry_id, dropped = %dropped, "班次收窄被拒绝");
            return Err(ApiError::InvalidState(crate::i18n::t_with_args(
                "form.slot_data_loss",
                &[("slots", dropped.as_str())],
            )));
        }

        let total_output: i32 = expansion.slots.values().sum();
        let entry = self
            .entry_repo
            .update_shift(entry_id, shift_type, expansion.slots, total_output)
            .await?;
        self.invalidate_caches().await;
        Ok(entry)
    }

    /// 删除条目 (仅草稿)
    #[instrument(skip(self), fields(form_id = %form_id, entry_id = %entry_id))]
    pub async fn delete_entry(
        &self,
        actor: &Actor,
        form_id: &str,
        entry_id: &str,
    ) -> ApiResult<()> {
        let form = self.load_form(form_id).await?;
        self.ensure_creator_or_admin(actor, &form, "编辑条目")?;
        self.ensure_draft(&form, "编辑条目")?;
        let entry = self.load_entry(form_id, entry_id).await?;

        self.entry_repo.delete(&entry.entry_id).await?;
        self.invalidate_caches().await;
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 加载表单, 不存在即 NotFound
    async fn load_form(&self, form_id: &str) -> ApiResult<DigitalForm> {
        self.form_repo
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("表单(id={})不存在", form_id)))
    }

    /// 加载条目并校验归属表单
    async fn load_entry(&self, form_id: &str, entry_id: &str) -> ApiResult<FormEntry> {
        let entry = self
            .entry_repo
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("条目(id={})不存在", entry_id)))?;
        if entry.form_id != form_id {
            return Err(ApiError::NotFound(format!(
                "条目(id={})不属于表单(id={})",
                entry_id, form_id
            )));
        }
        Ok(entry)
    }

    /// 创建人或管理员校验 (改/删/提交共用同一条规则)
    fn ensure_creator_or_admin(
        &self,
        actor: &Actor,
        form: &DigitalForm,
        action: &str,
    ) -> ApiResult<()> {
        if form.created_by == actor.user_id || actor.role.is_admin_tier() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied(format!(
                "只有创建人或管理员可以{}表单",
                action
            )))
        }
    }

    /// 管理员校验 (审批/驳回/导出)
    fn ensure_admin_tier(&self, actor: &Actor, action: &str) -> ApiResult<()> {
        if actor.role.is_admin_tier() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied(format!(
                "只有管理员可以{}表单",
                action
            )))
        }
    }

    /// 草稿状态校验
    fn ensure_draft(&self, form: &DigitalForm, action: &str) -> ApiResult<()> {
        if form.is_draft() {
            Ok(())
        } else {
            Err(ApiError::InvalidState(format!(
                "只有草稿状态的表单才能{}",
                action
            )))
        }
    }

    /// 生成表单编码
    ///
    /// 格式: PCD-<YYMMDD>-<工厂码>-<产线码>-<班组码>-<小组码>-<班次码>-<3位随机数>
    /// 随机后缀化解同日碰撞, 无需全局计数器。
    async fn generate_form_code(
        &self,
        date: NaiveDate,
        factory_id: &str,
        line_id: &str,
        team_id: &str,
        group_id: &str,
        shift_type: ShiftType,
    ) -> ApiResult<String> {
        let factory = self
            .org_repo
            .factory_info(factory_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("工厂(id={})不存在", factory_id)))?;
        let line = self
            .org_repo
            .line_info(line_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("产线(id={})不存在", line_id)))?;
        let team = self
            .org_repo
            .team_info(team_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("班组(id={})不存在", team_id)))?;
        let group = self
            .org_repo
            .group_info(group_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("小组(id={})不存在", group_id)))?;

        let suffix = (Uuid::new_v4().as_u128() % 1000) as u32;
        Ok(format!(
            "PCD-{}-{}-{}-{}-{}-{}-{:03}",
            date.format("%y%m%d"),
            factory.code,
            line.code,
            team.code,
            group.code,
            shift_type.code(),
            suffix
        ))
    }

    /// 质量评分范围校验
    fn validate_quality_score(score: i32) -> ApiResult<()> {
        if (0..=100).contains(&score) {
            Ok(())
        } else {
            Err(ApiError::InvalidInput(format!(
                "质量评分必须在0-100之间: {}",
                score
            )))
        }
    }

    /// 生产问题校验 (影响百分比 0-100, 时段序号在班次范围内)
    fn validate_issues(issues: &[ProductionIssue], shift_type: ShiftType) -> ApiResult<()> {
        let slot_count = time_slot::slot_count(shift_type) as i32;
        for issue in issues {
            if !(0..=100).contains(&issue.impact_percent) {
                return Err(ApiError::InvalidInput(format!(
                    "问题影响百分比必须在0-100之间: {}",
                    issue.impact_percent
                )));
            }
            if issue.hour_index < 0 || issue.hour_index >= slot_count {
                return Err(ApiError::InvalidInput(format!(
                    "问题时段序号超出班次范围: {} (班次共{}个时段)",
                    issue.hour_index, slot_count
                )));
            }
        }
        Ok(())
    }

    /// 时段标签必须属于条目班次
    fn validate_slot_labels(
        data: &BTreeMap<String, i32>,
        shift_type: ShiftType,
    ) -> ApiResult<()> {
        for label in data.keys() {
            if time_slot::slot_index(shift_type, label).is_none() {
                return Err(ApiError::InvalidInput(format!(
                    "时段标签{}不属于班次{}",
                    label, shift_type
                )));
            }
        }
        Ok(())
    }

    /// 写操作后整批失效缓存
    async fn invalidate_caches(&self) {
        self.cache.invalidate_tag(CacheTag::Forms).await;
        self.cache.invalidate_tag(CacheTag::Reports).await;
    }
}
