// ==========================================
// 手袋工厂生产追踪系统 - 报表 API
// ==========================================
// 职责: 按组织层级取数 → 聚合引擎计算 → 报表缓存读穿
// 层级: 工厂 → 产线 → 班组 → 小组 (→ 工人)
// 红线: 报表纯派生, 查询参数为键短时缓存, 任何写入整批失效
// 红线: 对比分析少于两个实体时在取数前拒绝
// ==========================================

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::cache::{CacheTag, ReportCache};
use crate::config::AppConfig;
use crate::domain::form::{DigitalForm, FormEntry};
use crate::domain::report::{ComparisonReport, ProductionReport, ReportOptions, ReportScope};
use crate::domain::types::{ComparisonEntityKind, OrgLevel};
use crate::engine::aggregation::{ChildDataset, DimensionNames, ReportAggregator};
use crate::engine::comparison::{ComparisonAssembler, EntityReport};
use crate::repository::entry_repo::FormEntryRepository;
use crate::repository::form_repo::{FormRepository, OrgScopeFilter};
use crate::repository::org_repo::{OrgDirectory, OrgUnitInfo};
use crate::repository::product_repo::ProductDirectory;

// ==========================================
// 对比查询请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub entity_kind: ComparisonEntityKind,
    pub entity_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    form_repo: Arc<dyn FormRepository>,
    entry_repo: Arc<dyn FormEntryRepository>,
    org_repo: Arc<dyn OrgDirectory>,
    product_repo: Arc<dyn ProductDirectory>,
    cache: Arc<dyn ReportCache>,
    config: AppConfig,
    aggregator: ReportAggregator,
    assembler: ComparisonAssembler,
}

impl ReportApi {
    /// 创建新的 ReportApi 实例
    pub fn new(
        form_repo: Arc<dyn FormRepository>,
        entry_repo: Arc<dyn FormEntryRepository>,
        org_repo: Arc<dyn OrgDirectory>,
        product_repo: Arc<dyn ProductDirectory>,
        cache: Arc<dyn ReportCache>,
        config: AppConfig,
    ) -> Self {
        Self {
            form_repo,
            entry_repo,
            org_repo,
            product_repo,
            cache,
            config,
            aggregator: ReportAggregator::new(),
            assembler: ComparisonAssembler::new(),
        }
    }

    // ==========================================
    // 层级报表查询
    // ==========================================

    /// 工厂报表 (下级汇总 = 产线)
    #[instrument(skip(self, options), fields(factory_id = %factory_id))]
    pub async fn by_factory(
        &self,
        factory_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        options: &ReportOptions,
    ) -> ApiResult<ProductionReport> {
        self.scope_report(OrgLevel::Factory, factory_id, date_from, date_to, options)
            .await
    }

    /// 产线报表 (下级汇总 = 班组)
    #[instrument(skip(self, options), fields(line_id = %line_id))]
    pub async fn by_line(
        &self,
        line_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        options: &ReportOptions,
    ) -> ApiResult<ProductionReport> {
        self.scope_report(OrgLevel::Line, line_id, date_from, date_to, options)
            .await
    }

    /// 班组报表 (下级汇总 = 小组)
    #[instrument(skip(self, options), fields(team_id = %team_id))]
    pub async fn by_team(
        &self,
        team_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        options: &ReportOptions,
    ) -> ApiResult<ProductionReport> {
        self.scope_report(OrgLevel::Team, team_id, date_from, date_to, options)
            .await
    }

    /// 小组报表 (下级汇总 = 工人)
    #[instrument(skip(self, options), fields(group_id = %group_id))]
    pub async fn by_group(
        &self,
        group_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        options: &ReportOptions,
    ) -> ApiResult<ProductionReport> {
        self.scope_report(OrgLevel::Group, group_id, date_from, date_to, options)
            .await
    }

    // ==========================================
    // 对比分析
    // ==========================================

    /// 班组/小组对比
    ///
    /// 各实体的聚合报表独立并发计算, 再按同一时间轴/维度轴透视对齐。
    #[instrument(skip(self, options), fields(kind = %request.entity_kind))]
    pub async fn compare(
        &self,
        request: CompareRequest,
        options: &ReportOptions,
    ) -> ApiResult<ComparisonReport> {
        // 取数前校验输入
        if request.entity_ids.len() < 2 {
            return Err(ApiError::InvalidInput(
                "对比分析至少需要两个对象".to_string(),
            ));
        }
        let distinct: HashSet<&String> = request.entity_ids.iter().collect();
        if distinct.len() != request.entity_ids.len() {
            return Err(ApiError::InvalidInput("对比对象不能重复".to_string()));
        }
        Self::validate_range(request.date_from, request.date_to)?;

        let cache_key = format!(
            "reports:compare:{}:{}:{}:{}:{}",
            request.entity_kind,
            request.entity_ids.join(","),
            request.date_from,
            request.date_to,
            Self::options_key(options),
        );
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(report) = serde_json::from_str::<ComparisonReport>(&cached) {
                debug!(key = %cache_key, "对比报表缓存命中");
                return Ok(report);
            }
        }

        // 子报表不再递归下级汇总
        let sub_options = ReportOptions {
            include_children: false,
            ..options.clone()
        };
        let entity_kind = request.entity_kind;
        let date_from = request.date_from;
        let date_to = request.date_to;

        // 各实体报表相互独立, 并发取数计算
        let entities = try_join_all(request.entity_ids.iter().map(|entity_id| {
            let sub_options = sub_options.clone();
            async move {
                let (info, report) = match entity_kind {
                    ComparisonEntityKind::Team => {
                        let info = self.org_repo.team_info(entity_id).await?.ok_or_else(|| {
                            ApiError::NotFound(format!("班组(id={})不存在", entity_id))
                        })?;
                        let report = self
                            .by_team(entity_id, date_from, date_to, &sub_options)
                            .await?;
                        (info, report)
                    }
                    ComparisonEntityKind::Group => {
                        let info = self.org_repo.group_info(entity_id).await?.ok_or_else(|| {
                            ApiError::NotFound(format!("小组(id={})不存在", entity_id))
                        })?;
                        let report = self
                            .by_group(entity_id, date_from, date_to, &sub_options)
                            .await?;
                        (info, report)
                    }
                };
                Ok::<EntityReport, ApiError>(EntityReport { info, report })
            }
        }))
        .await?;

        let report = self
            .assembler
            .assemble(entity_kind, date_from, date_to, &entities);

        if let Ok(json) = serde_json::to_string(&report) {
            self.cache
                .put(&cache_key, json, CacheTag::Reports, self.cache_ttl())
                .await;
        }
        Ok(report)
    }

    // ==========================================
    // 内部: 层级报表流程
    // ==========================================

    /// 层级报表公共流程: 缓存读穿 → 范围解析 → 取数 → 聚合 → 下级汇总
    async fn scope_report(
        &self,
        level: OrgLevel,
        scope_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        options: &ReportOptions,
    ) -> ApiResult<ProductionReport> {
        Self::validate_range(date_from, date_to)?;

        let cache_key = format!(
            "reports:{}:{}:{}:{}:{}",
            level,
            scope_id,
            date_from,
            date_to,
            Self::options_key(options),
        );
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(report) = serde_json::from_str::<ProductionReport>(&cached) {
                debug!(key = %cache_key, "报表缓存命中");
                return Ok(report);
            }
        }

        let scope_info = self.resolve_scope(level, scope_id).await?;
        let scope_filter = Self::scope_filter(level, scope_id);

        let forms = self
            .form_repo
            .list_by_scope_and_range(&scope_filter, date_from, date_to)
            .await?;
        let form_ids: Vec<String> = forms.iter().map(|f| f.form_id.clone()).collect();

        // 小组报表只统计该小组成员的条目, 排除跨组借调工人
        let entries = match level {
            OrgLevel::Group => {
                self.entry_repo
                    .list_by_group_and_form_ids(scope_id, &form_ids)
                    .await?
            }
            _ => self.entry_repo.list_by_form_ids(&form_ids).await?,
        };

        let names = self.fetch_dimension_names(&entries, options).await?;

        let scope = ReportScope {
            level,
            scope_id: scope_id.to_string(),
            code: scope_info.code,
            name: scope_info.name,
        };
        let mut report = self.aggregator.build_report(
            scope, date_from, date_to, &forms, &entries, &names, options,
        );

        if options.include_children {
            let children = self
                .build_child_datasets(level, scope_id, &forms, &entries)
                .await?;
            report.children = self.aggregator.rollup_children(&entries, &children);
        }

        if let Ok(json) = serde_json::to_string(&report) {
            self.cache
                .put(&cache_key, json, CacheTag::Reports, self.cache_ttl())
                .await;
        }
        Ok(report)
    }

    /// 解析报表范围单元信息, 不存在即 NotFound
    async fn resolve_scope(&self, level: OrgLevel, scope_id: &str) -> ApiResult<OrgUnitInfo> {
        let (info, label) = match level {
            OrgLevel::Factory => (self.org_repo.factory_info(scope_id).await?, "工厂"),
            OrgLevel::Line => (self.org_repo.line_info(scope_id).await?, "产线"),
            OrgLevel::Team => (self.org_repo.team_info(scope_id).await?, "班组"),
            OrgLevel::Group => (self.org_repo.group_info(scope_id).await?, "小组"),
            OrgLevel::Worker => (None, "工人"),
        };
        info.ok_or_else(|| ApiError::NotFound(format!("{}(id={})不存在", label, scope_id)))
    }

    fn scope_filter(level: OrgLevel, scope_id: &str) -> OrgScopeFilter {
        match level {
            OrgLevel::Factory => OrgScopeFilter::Factory(scope_id.to_string()),
            OrgLevel::Line => OrgScopeFilter::Line(scope_id.to_string()),
            // Worker 层级无独立报表, 落在小组过滤上
            OrgLevel::Team => OrgScopeFilter::Team(scope_id.to_string()),
            OrgLevel::Group | OrgLevel::Worker => OrgScopeFilter::Group(scope_id.to_string()),
        }
    }

    /// 并发预取维度名称映射 (按开关省略)
    async fn fetch_dimension_names(
        &self,
        entries: &[FormEntry],
        options: &ReportOptions,
    ) -> ApiResult<DimensionNames> {
        let handbag_ids: Vec<String> = if options.include_products {
            Self::distinct(entries.iter().map(|e| e.handbag_id.clone()))
        } else {
            Vec::new()
        };
        let process_ids: Vec<String> = if options.include_processes {
            Self::distinct(entries.iter().map(|e| e.process_id.clone()))
        } else {
            Vec::new()
        };

        // 两个维度目录查询相互独立, 并发取数
        let (handbags, processes) = tokio::try_join!(
            self.product_repo.handbags_by_ids(&handbag_ids),
            self.product_repo.processes_by_ids(&process_ids),
        )?;

        Ok(DimensionNames {
            handbags: handbags.into_iter().map(|p| (p.id.clone(), p)).collect(),
            processes: processes.into_iter().map(|p| (p.id.clone(), p)).collect(),
        })
    }

    /// 构建下级单元数据集
    ///
    /// 下级单元ID挂在表单上 (产线/班组/小组) 或条目上 (工人),
    /// 已取回的范围数据按下级单元确定性拆分, 目录列出的每个下级都有数据集。
    async fn build_child_datasets(
        &self,
        level: OrgLevel,
        scope_id: &str,
        forms: &[DigitalForm],
        entries: &[FormEntry],
    ) -> ApiResult<Vec<ChildDataset>> {
        // 工人层级: 下级来自小组成员名册, 按条目的 user_id 拆分
        if level == OrgLevel::Group {
            let workers = self.org_repo.workers_of_group(scope_id).await?;
            let mut entries_by_worker: HashMap<&str, Vec<FormEntry>> = HashMap::new();
            for entry in entries {
                entries_by_worker
                    .entry(entry.user_id.as_str())
                    .or_default()
                    .push(entry.clone());
            }
            return Ok(workers
                .into_iter()
                .map(|worker| {
                    let worker_entries = entries_by_worker
                        .remove(worker.user_id.as_str())
                        .unwrap_or_default();
                    let form_count = Self::distinct(
                        worker_entries.iter().map(|e| e.form_id.clone()),
                    )
                    .len() as i64;
                    ChildDataset {
                        info: OrgUnitInfo {
                            id: worker.user_id,
                            code: worker.employee_code,
                            name: worker.full_name,
                        },
                        form_count,
                        entries: worker_entries,
                    }
                })
                .collect());
        }

        // 单元层级: 下级来自组织目录, 按表单上的下级ID拆分
        let children = match level {
            OrgLevel::Factory => self.org_repo.lines_of_factory(scope_id).await?,
            OrgLevel::Line => self.org_repo.teams_of_line(scope_id).await?,
            OrgLevel::Team => self.org_repo.groups_of_team(scope_id).await?,
            _ => Vec::new(),
        };

        let child_of_form = |form: &DigitalForm| -> String {
            match level {
                OrgLevel::Factory => form.line_id.clone(),
                OrgLevel::Line => form.team_id.clone(),
                _ => form.group_id.clone(),
            }
        };

        let mut forms_per_child: HashMap<String, i64> = HashMap::new();
        let mut child_of_form_id: HashMap<&str, String> = HashMap::new();
        for form in forms {
            let child_id = child_of_form(form);
            *forms_per_child.entry(child_id.clone()).or_insert(0) += 1;
            child_of_form_id.insert(form.form_id.as_str(), child_id);
        }

        let mut entries_per_child: HashMap<String, Vec<FormEntry>> = HashMap::new();
        for entry in entries {
            if let Some(child_id) = child_of_form_id.get(entry.form_id.as_str()) {
                entries_per_child
                    .entry(child_id.clone())
                    .or_default()
                    .push(entry.clone());
            }
        }

        Ok(children
            .into_iter()
            .map(|info| {
                let form_count = forms_per_child.get(&info.id).copied().unwrap_or(0);
                let child_entries = entries_per_child.remove(&info.id).unwrap_or_default();
                ChildDataset {
                    info,
                    form_count,
                    entries: child_entries,
                }
            })
            .collect())
    }

    // ==========================================
    // 内部: 小工具
    // ==========================================

    /// 日期区间校验
    fn validate_range(date_from: NaiveDate, date_to: NaiveDate) -> ApiResult<()> {
        if date_from > date_to {
            Err(ApiError::InvalidInput(format!(
                "日期区间无效: {} 晚于 {}",
                date_from, date_to
            )))
        } else {
            Ok(())
        }
    }

    /// 报表选项编码进缓存键 (开关不同的查询互不串缓存)
    fn options_key(options: &ReportOptions) -> String {
        format!(
            "{}{}{}{}{}{}",
            options.include_products as u8,
            options.include_processes as u8,
            options.include_hourly as u8,
            options.include_daily as u8,
            options.include_issues as u8,
            options.include_children as u8,
        )
    }

    /// 去重保序
    fn distinct(ids: impl Iterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for id in ids {
            if seen.insert(id.clone()) {
                result.push(id);
            }
        }
        result
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config.report_cache_ttl_secs)
    }
}
