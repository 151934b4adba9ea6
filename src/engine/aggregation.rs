// ==========================================
// 手袋工厂生产追踪系统 - 聚合报表引擎
// ==========================================
// 职责: 对任意组织层级的条目集计算统计报表
// 输入: 已按范围/日期取回的表单与条目集 + 预取的维度名称映射
// 输出: ProductionReport (纯派生, 不持久化)
// 红线: 无状态引擎, 所有方法都是纯函数, O(n) 遍历
// 红线: 空输入返回完整清零的报表结构, 从不返回 null
// ==========================================

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::form::{DigitalForm, FormEntry};
use crate::domain::report::{
    AttendanceCount, AttendanceSummary, ChildUnitSummary, DailyBreakdownRow, HourlyBreakdownRow,
    IssueSummaryRow, ProcessBreakdownRow, ProductBreakdownRow, ProductionReport, ReportOptions,
    ReportScope, ReportTotals,
};
use crate::domain::types::{AttendanceStatus, IssueType};
use crate::repository::org_repo::OrgUnitInfo;
use crate::repository::product_repo::ProductInfo;

// ==========================================
// 输入辅助类型
// ==========================================

/// 维度名称映射 (调用方从产品目录预取)
#[derive(Debug, Clone, Default)]
pub struct DimensionNames {
    pub handbags: HashMap<String, ProductInfo>,
    pub processes: HashMap<String, ProductInfo>,
}

impl DimensionNames {
    fn handbag_label(&self, id: &str) -> (String, String) {
        match self.handbags.get(id) {
            Some(info) => (info.code.clone(), info.name.clone()),
            None => (id.to_string(), "未知".to_string()),
        }
    }

    fn process_label(&self, id: &str) -> (String, String) {
        match self.processes.get(id) {
            Some(info) => (info.code.clone(), info.name.clone()),
            None => (id.to_string(), "未知".to_string()),
        }
    }
}

/// 下级单元数据集 (调用方按下级单元拆分后传入)
#[derive(Debug, Clone)]
pub struct ChildDataset {
    pub info: OrgUnitInfo,
    pub form_count: i64,
    pub entries: Vec<FormEntry>,
}

// ==========================================
// ReportAggregator - 聚合报表引擎
// ==========================================
pub struct ReportAggregator;

impl ReportAggregator {
    /// 创建新的聚合引擎
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 效率公式 (条目级)
    // ==========================================

    /// 条目级效率: round(产量 / 计划 * 100); 计划 <= 0 时取 0
    ///
    /// 这是跨组织规模的归一化可比指标。
    /// 注意与上卷级 relative_efficiency_pct (相对上级人均产量) 区分。
    pub fn efficiency_pct(output: i64, planned: i64) -> i32 {
        if planned > 0 {
            ((output as f64 / planned as f64) * 100.0).round() as i32
        } else {
            0
        }
    }

    // ==========================================
    // 汇总指标
    // ==========================================

    /// 计算汇总指标
    pub fn totals(&self, forms: &[DigitalForm], entries: &[FormEntry]) -> ReportTotals {
        if entries.is_empty() {
            return ReportTotals {
                form_count: forms.len() as i64,
                ..ReportTotals::zero()
            };
        }

        let total_output: i64 = entries.iter().map(|e| e.total_output as i64).sum();
        let total_planned: i64 = entries.iter().map(|e| e.planned_output as i64).sum();
        let quality_sum: i64 = entries.iter().map(|e| e.quality_score as i64).sum();
        let count = entries.len() as i64;

        ReportTotals {
            form_count: forms.len() as i64,
            entry_count: count,
            total_output,
            total_planned,
            average_quality: (quality_sum as f64 / count as f64).round() as i32,
            efficiency_pct: Self::efficiency_pct(total_output, total_planned),
        }
    }

    // ==========================================
    // 出勤分布
    // ==========================================

    /// 计算出勤分布
    /// 每个状态都输出一行 (无数据时为零值行), 调用方无需特判
    pub fn attendance(&self, entries: &[FormEntry]) -> AttendanceSummary {
        let mut by_status: HashMap<AttendanceStatus, i64> = HashMap::new();
        for entry in entries {
            *by_status.entry(entry.attendance_status).or_insert(0) += 1;
        }

        let counts: Vec<AttendanceCount> = AttendanceStatus::ALL
            .iter()
            .map(|status| AttendanceCount {
                status: *status,
                count: by_status.get(status).copied().unwrap_or(0),
            })
            .collect();

        let total = entries.len() as i64;
        let present = by_status
            .get(&AttendanceStatus::Present)
            .copied()
            .unwrap_or(0);
        let percent_present = if total > 0 {
            ((present as f64 / total as f64) * 100.0).round() as i32
        } else {
            0
        };

        AttendanceSummary {
            counts,
            percent_present,
        }
    }

    // ==========================================
    // 维度分解
    // ==========================================

    /// 按手袋分解 (产量降序, 同值按ID升序稳定; 唯一计算占比的维度)
    pub fn by_product(
        &self,
        entries: &[FormEntry],
        names: &DimensionNames,
    ) -> Vec<ProductBreakdownRow> {
        let mut by_handbag: HashMap<&str, i64> = HashMap::new();
        for entry in entries {
            *by_handbag.entry(entry.handbag_id.as_str()).or_insert(0) +=
                entry.total_output as i64;
        }

        let grand_total: i64 = by_handbag.values().sum();

        let mut rows: Vec<ProductBreakdownRow> = by_handbag
            .into_iter()
            .map(|(handbag_id, total_output)| {
                let (code, name) = names.handbag_label(handbag_id);
                let percent_of_total = if grand_total > 0 {
                    ((total_output as f64 / grand_total as f64) * 100.0).round() as i32
                } else {
                    0
                };
                ProductBreakdownRow {
                    handbag_id: handbag_id.to_string(),
                    handbag_code: code,
                    handbag_name: name,
                    total_output,
                    percent_of_total,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_output
                .cmp(&a.total_output)
                .then_with(|| a.handbag_id.cmp(&b.handbag_id))
        });
        rows
    }

    /// 按工序分解 (产量降序, 同值按ID升序稳定)
    pub fn by_process(
        &self,
        entries: &[FormEntry],
        names: &DimensionNames,
    ) -> Vec<ProcessBreakdownRow> {
        let mut by_process: HashMap<&str, i64> = HashMap::new();
        for entry in entries {
            *by_process.entry(entry.process_id.as_str()).or_insert(0) +=
                entry.total_output as i64;
        }

        let mut rows: Vec<ProcessBreakdownRow> = by_process
            .into_iter()
            .map(|(process_id, total_output)| {
                let (code, name) = names.process_label(process_id);
                ProcessBreakdownRow {
                    process_id: process_id.to_string(),
                    process_code: code,
                    process_name: name,
                    total_output,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_output
                .cmp(&a.total_output)
                .then_with(|| a.process_id.cmp(&b.process_id))
        });
        rows
    }

    /// 按时段分解 (时段标签升序即时间序)
    ///
    /// 取全部条目时段键的并集; 均值只对上报了该时段的条目计算,
    /// 未在该时段工作的条目不稀释均值。
    pub fn by_hour(&self, entries: &[FormEntry]) -> Vec<HourlyBreakdownRow> {
        // BTreeMap: 标签字典序即时间序
        let mut by_slot: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
        for entry in entries {
            for (label, output) in &entry.hourly_data {
                let slot = by_slot.entry(label.as_str()).or_insert((0, 0));
                slot.0 += *output as i64;
                slot.1 += 1;
            }
        }

        by_slot
            .into_iter()
            .map(|(label, (total, reporters))| HourlyBreakdownRow {
                slot_label: label.to_string(),
                total_output: total,
                entry_count: reporters,
                average_output: if reporters > 0 {
                    (total as f64 / reporters as f64).round() as i32
                } else {
                    0
                },
            })
            .collect()
    }

    /// 按日分解 (日期升序)
    ///
    /// 日期挂在表单上而非条目上: 先按日分组表单, 再聚合该日表单的条目。
    pub fn by_day(&self, forms: &[DigitalForm], entries: &[FormEntry]) -> Vec<DailyBreakdownRow> {
        // 表单ID → 日期
        let date_of_form: HashMap<&str, NaiveDate> = forms
            .iter()
            .map(|f| (f.form_id.as_str(), f.date))
            .collect();

        // 日期 → 表单数 (BTreeMap 保证日期升序)
        let mut forms_per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for form in forms {
            *forms_per_day.entry(form.date).or_insert(0) += 1;
        }

        // 日期 → (条目数, 产量, 计划)
        let mut entries_per_day: HashMap<NaiveDate, (i64, i64, i64)> = HashMap::new();
        for entry in entries {
            if let Some(date) = date_of_form.get(entry.form_id.as_str()) {
                let day = entries_per_day.entry(*date).or_insert((0, 0, 0));
                day.0 += 1;
                day.1 += entry.total_output as i64;
                day.2 += entry.planned_output as i64;
            }
        }

        forms_per_day
            .into_iter()
            .map(|(date, form_count)| {
                let (entry_count, total_output, total_planned) =
                    entries_per_day.get(&date).copied().unwrap_or((0, 0, 0));
                DailyBreakdownRow {
                    date,
                    form_count,
                    entry_count,
                    total_output,
                    total_planned,
                    efficiency_pct: Self::efficiency_pct(total_output, total_planned),
                }
            })
            .collect()
    }

    /// 问题汇总 (发生次数降序, 同次数按影响降序, 再按类型序号稳定)
    pub fn issue_summary(&self, entries: &[FormEntry]) -> Vec<IssueSummaryRow> {
        let mut by_type: HashMap<IssueType, (i64, i64)> = HashMap::new();
        for entry in entries {
            for issue in &entry.issues {
                let row = by_type.entry(issue.issue_type).or_insert((0, 0));
                row.0 += 1;
                row.1 += issue.impact_percent as i64;
            }
        }

        let mut rows: Vec<IssueSummaryRow> = by_type
            .into_iter()
            .map(|(issue_type, (occurrences, total_impact_percent))| IssueSummaryRow {
                issue_type,
                occurrences,
                total_impact_percent,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| b.total_impact_percent.cmp(&a.total_impact_percent))
                .then_with(|| a.issue_type.ordinal().cmp(&b.issue_type.ordinal()))
        });
        rows
    }

    // ==========================================
    // 递归上卷
    // ==========================================

    /// 下级单元汇总
    ///
    /// 上卷效率以上级人均产量为基准:
    /// relative_efficiency_pct = round(下级人均产量 / 上级人均产量 * 100)
    /// (人均产量 = 总产量 / 有上报记录的工人数)
    /// 目录列出的每个下级单元都输出一行, 无数据的单元为零值行。
    pub fn rollup_children(
        &self,
        parent_entries: &[FormEntry],
        children: &[ChildDataset],
    ) -> Vec<ChildUnitSummary> {
        let parent_output: i64 = parent_entries.iter().map(|e| e.total_output as i64).sum();
        let parent_workers = Self::distinct_workers(parent_entries);
        let parent_avg = if parent_workers > 0 {
            parent_output as f64 / parent_workers as f64
        } else {
            0.0
        };

        let mut rows: Vec<ChildUnitSummary> = children
            .iter()
            .map(|child| {
                let total_output: i64 =
                    child.entries.iter().map(|e| e.total_output as i64).sum();
                let worker_count = Self::distinct_workers(&child.entries);
                let avg_output_per_worker = if worker_count > 0 {
                    total_output as f64 / worker_count as f64
                } else {
                    0.0
                };
                let relative_efficiency_pct = if parent_avg > 0.0 {
                    ((avg_output_per_worker / parent_avg) * 100.0).round() as i32
                } else {
                    0
                };
                ChildUnitSummary {
                    unit_id: child.info.id.clone(),
                    unit_code: child.info.code.clone(),
                    unit_name: child.info.name.clone(),
                    form_count: child.form_count,
                    entry_count: child.entries.len() as i64,
                    worker_count,
                    total_output,
                    avg_output_per_worker,
                    relative_efficiency_pct,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_output
                .cmp(&a.total_output)
                .then_with(|| a.unit_id.cmp(&b.unit_id))
        });
        rows
    }

    /// 有上报记录的工人数
    fn distinct_workers(entries: &[FormEntry]) -> i64 {
        entries
            .iter()
            .map(|e| e.user_id.as_str())
            .collect::<HashSet<_>>()
            .len() as i64
    }

    // ==========================================
    // 报表组装
    // ==========================================

    /// 组装聚合报表 (children 由调用方按下级数据集另行填充)
    pub fn build_report(
        &self,
        scope: ReportScope,
        date_from: NaiveDate,
        date_to: NaiveDate,
        forms: &[DigitalForm],
        entries: &[FormEntry],
        names: &DimensionNames,
        options: &ReportOptions,
    ) -> ProductionReport {
        ProductionReport {
            scope,
            date_from,
            date_to,
            totals: self.totals(forms, entries),
            attendance: self.attendance(entries),
            by_product: if options.include_products {
                self.by_product(entries, names)
            } else {
                Vec::new()
            },
            by_process: if options.include_processes {
                self.by_process(entries, names)
            } else {
                Vec::new()
            },
            by_hour: if options.include_hourly {
                self.by_hour(entries)
            } else {
                Vec::new()
            },
            by_day: if options.include_daily {
                self.by_day(forms, entries)
            } else {
                Vec::new()
            },
            issues: if options.include_issues {
                self.issue_summary(entries)
            } else {
                Vec::new()
            },
            children: Vec::new(),
        }
    }
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}
