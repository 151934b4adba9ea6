// ==========================================
// 手袋工厂生产追踪系统 - 报表领域模型
// ==========================================
// 职责: 聚合报表 / 对比报表 的结构定义
// 红线: 报表纯派生, 从不持久化, 每次查询重算
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::{
    AttendanceStatus, ComparisonEntityKind, IssueType, OrgLevel,
};

// ==========================================
// 报表选项 (include 开关)
// ==========================================
// 用途: 大范围查询时限制可选分解的计算成本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub include_products: bool,  // 按手袋分解
    pub include_processes: bool, // 按工序分解
    pub include_hourly: bool,    // 按时段分解
    pub include_daily: bool,     // 按日分解
    pub include_issues: bool,    // 问题汇总
    pub include_children: bool,  // 下级单元汇总 (递归上卷)
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_products: true,
            include_processes: true,
            include_hourly: true,
            include_daily: true,
            include_issues: true,
            include_children: false,
        }
    }
}

impl ReportOptions {
    /// 全部开启 (含下级汇总)
    pub fn full() -> Self {
        Self {
            include_children: true,
            ..Self::default()
        }
    }
}

// ==========================================
// 报表范围信息
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportScope {
    pub level: OrgLevel,   // 组织层级
    pub scope_id: String,  // 单元ID
    pub code: String,      // 单元编码
    pub name: String,      // 单元名称
}

// ==========================================
// 汇总指标
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTotals {
    pub form_count: i64,      // 表单数
    pub entry_count: i64,     // 条目数
    pub total_output: i64,    // 总产量
    pub total_planned: i64,   // 总计划产量
    pub average_quality: i32, // 平均质量评分 (四舍五入)
    pub efficiency_pct: i32,  // 效率 = round(产量/计划*100), 计划为0时取0
}

impl ReportTotals {
    /// 全零汇总 (空数据契约: 结构完整, 数值清零)
    pub fn zero() -> Self {
        Self {
            form_count: 0,
            entry_count: 0,
            total_output: 0,
            total_planned: 0,
            average_quality: 0,
            efficiency_pct: 0,
        }
    }
}

// ==========================================
// 出勤分布
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCount {
    pub status: AttendanceStatus, // 出勤状态
    pub count: i64,               // 条目数
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummary {
    // 每个状态一行, 无数据也保留零值行
    pub counts: Vec<AttendanceCount>,
    pub percent_present: i32, // 出勤率 = round(出勤/总数*100)
}

// ==========================================
// 维度分解行
// ==========================================

/// 按手袋分解 (唯一带占比的维度)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBreakdownRow {
    pub handbag_id: String,
    pub handbag_code: String,
    pub handbag_name: String,
    pub total_output: i64,
    pub percent_of_total: i32, // 占总产量百分比
}

/// 按工序分解
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessBreakdownRow {
    pub process_id: String,
    pub process_code: String,
    pub process_name: String,
    pub total_output: i64,
}

/// 按时段分解
/// 平均值只对"上报了该时段的条目"求均值, 未上报的条目不稀释均值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBreakdownRow {
    pub slot_label: String,    // 时段标签
    pub total_output: i64,     // 该时段总产量
    pub entry_count: i64,      // 上报该时段的条目数
    pub average_output: i32,   // round(总产量/上报条目数)
}

/// 按日分解
/// 日期挂在表单上, 先按日分组表单, 再聚合该日表单的条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBreakdownRow {
    pub date: NaiveDate,
    pub form_count: i64,
    pub entry_count: i64,
    pub total_output: i64,
    pub total_planned: i64,
    pub efficiency_pct: i32,
}

/// 问题汇总行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSummaryRow {
    pub issue_type: IssueType,
    pub occurrences: i64,          // 发生次数
    pub total_impact_percent: i64, // Σ 影响百分比
}

// ==========================================
// 下级单元汇总 (递归上卷)
// ==========================================
// 红线: 此处的效率与条目级效率是两个定义, 字段名必须区分:
// relative_efficiency_pct = round(下级人均产量 / 上级人均产量 * 100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildUnitSummary {
    pub unit_id: String,
    pub unit_code: String,
    pub unit_name: String,
    pub form_count: i64,
    pub entry_count: i64,
    pub worker_count: i64,              // 有上报记录的工人数
    pub total_output: i64,
    pub avg_output_per_worker: f64,     // 人均产量
    pub relative_efficiency_pct: i32,   // 相对上级人均产量的效率
}

// ==========================================
// ProductionReport - 聚合报表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionReport {
    pub scope: ReportScope,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub totals: ReportTotals,
    pub attendance: AttendanceSummary,
    pub by_product: Vec<ProductBreakdownRow>,
    pub by_process: Vec<ProcessBreakdownRow>,
    pub by_hour: Vec<HourlyBreakdownRow>,
    pub by_day: Vec<DailyBreakdownRow>,
    pub issues: Vec<IssueSummaryRow>,
    pub children: Vec<ChildUnitSummary>,
}

// ==========================================
// ComparisonReport - 对比报表
// ==========================================

/// 对比单元格: 实体在某个轴点上的取值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCell {
    pub total_output: i64,
    pub efficiency_pct: i32,
}

impl ComparisonCell {
    /// 零值单元格: 该轴点上无数据的实体补零而非缺行
    pub fn zero() -> Self {
        Self {
            total_output: 0,
            efficiency_pct: 0,
        }
    }
}

/// 实体总览行 (按总产量降序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummaryRow {
    pub entity_id: String,
    pub entity_code: String,
    pub entity_name: String,
    pub form_count: i64,
    pub entry_count: i64,
    pub total_output: i64,
    pub total_planned: i64,
    pub efficiency_pct: i32,
    pub average_quality: i32,
}

/// 按日对齐行 (日期升序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonDailyRow {
    pub date: NaiveDate,
    // 实体ID → 单元格; BTreeMap 保证序列化顺序稳定
    pub values: BTreeMap<String, ComparisonCell>,
}

/// 按维度对齐行 (手袋/工序, 合计产量降序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonDimensionRow {
    pub dimension_id: String,
    pub dimension_code: String,
    pub dimension_name: String,
    pub combined_output: i64, // 全部实体在该轴点的产量合计
    pub values: BTreeMap<String, ComparisonCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub entity_kind: ComparisonEntityKind,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub summaries: Vec<ComparisonSummaryRow>,
    pub daily: Vec<ComparisonDailyRow>,
    pub by_product: Vec<ComparisonDimensionRow>,
    pub by_process: Vec<ComparisonDimensionRow>,
}
