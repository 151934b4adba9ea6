// ==========================================
// 手袋工厂生产追踪系统 - 对比分析引擎
// ==========================================
// 职责: 将多个同类实体 (班组/小组) 的聚合报表按同一时间轴与维度轴对齐
// 输入: 每个实体独立算好的 ProductionReport (由聚合引擎产出)
// 输出: ComparisonReport
// 红线: 任一实体在某轴点无数据时补零值单元格, 不得缺行
// 红线: 无状态引擎, 所有方法都是纯函数
// ==========================================

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::report::{
    ComparisonCell, ComparisonDailyRow, ComparisonDimensionRow, ComparisonReport,
    ComparisonSummaryRow, ProductionReport,
};
use crate::domain::types::ComparisonEntityKind;
use crate::repository::org_repo::OrgUnitInfo;

// ==========================================
// 输入类型
// ==========================================

/// 单个参与对比的实体: 单元信息 + 其聚合报表
#[derive(Debug, Clone)]
pub struct EntityReport {
    pub info: OrgUnitInfo,
    pub report: ProductionReport,
}

// ==========================================
// ComparisonAssembler - 对比装配器
// ==========================================
pub struct ComparisonAssembler;

impl ComparisonAssembler {
    /// 创建新的对比装配器
    pub fn new() -> Self {
        Self
    }

    /// 装配对比报表
    ///
    /// 透视规则: 对任一实体报表中出现过的每个轴点 (日期/手袋/工序),
    /// 生成一行合并记录, 行内按实体ID挂单元格, 缺数据的实体补零。
    pub fn assemble(
        &self,
        entity_kind: ComparisonEntityKind,
        date_from: NaiveDate,
        date_to: NaiveDate,
        entities: &[EntityReport],
    ) -> ComparisonReport {
        ComparisonReport {
            entity_kind,
            date_from,
            date_to,
            summaries: self.summaries(entities),
            daily: self.daily_series(entities),
            by_product: self.dimension_series(entities, DimensionAxis::Product),
            by_process: self.dimension_series(entities, DimensionAxis::Process),
        }
    }

    // ==========================================
    // 实体总览
    // ==========================================

    /// 每实体一行总览 (总产量降序, 同值按ID升序稳定)
    fn summaries(&self, entities: &[EntityReport]) -> Vec<ComparisonSummaryRow> {
        let mut rows: Vec<ComparisonSummaryRow> = entities
            .iter()
            .map(|entity| {
                let totals = &entity.report.totals;
                ComparisonSummaryRow {
                    entity_id: entity.info.id.clone(),
                    entity_code: entity.info.code.clone(),
                    entity_name: entity.info.name.clone(),
                    form_count: totals.form_count,
                    entry_count: totals.entry_count,
                    total_output: totals.total_output,
                    total_planned: totals.total_planned,
                    efficiency_pct: totals.efficiency_pct,
                    average_quality: totals.average_quality,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_output
                .cmp(&a.total_output)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        rows
    }

    // ==========================================
    // 按日对齐
    // ==========================================

    /// 按日对齐序列 (日期升序)
    fn daily_series(&self, entities: &[EntityReport]) -> Vec<ComparisonDailyRow> {
        // 任一实体出现过的日期并集 (BTreeSet 保证升序)
        let dates: BTreeSet<NaiveDate> = entities
            .iter()
            .flat_map(|e| e.report.by_day.iter().map(|row| row.date))
            .collect();

        dates
            .into_iter()
            .map(|date| {
                let mut values = BTreeMap::new();
                for entity in entities {
                    let cell = entity
                        .report
                        .by_day
                        .iter()
                        .find(|row| row.date == date)
                        .map(|row| ComparisonCell {
                            total_output: row.total_output,
                            efficiency_pct: row.efficiency_pct,
                        })
                        .unwrap_or_else(ComparisonCell::zero);
                    values.insert(entity.info.id.clone(), cell);
                }
                ComparisonDailyRow { date, values }
            })
            .collect()
    }

    // ==========================================
    // 按维度对齐
    // ==========================================

    /// 按维度对齐序列 (合计产量降序, 同值按维度ID升序稳定)
    fn dimension_series(
        &self,
        entities: &[EntityReport],
        axis: DimensionAxis,
    ) -> Vec<ComparisonDimensionRow> {
        // 维度ID → (编码, 名称); 任一实体报表出现过即收录
        let mut labels: BTreeMap<String, (String, String)> = BTreeMap::new();
        for entity in entities {
            for (id, code, name, _) in axis.rows(&entity.report) {
                labels
                    .entry(id.to_string())
                    .or_insert_with(|| (code.to_string(), name.to_string()));
            }
        }

        let mut rows: Vec<ComparisonDimensionRow> = labels
            .into_iter()
            .map(|(dimension_id, (dimension_code, dimension_name))| {
                let mut values = BTreeMap::new();
                let mut combined_output = 0i64;
                for entity in entities {
                    // 维度分解行不携带计划数, 单元格效率取实体整体效率
                    let cell = axis
                        .rows(&entity.report)
                        .find(|(id, _, _, _)| *id == dimension_id)
                        .map(|(_, _, _, output)| ComparisonCell {
                            total_output: output,
                            efficiency_pct: entity.report.totals.efficiency_pct,
                        })
                        .unwrap_or_else(ComparisonCell::zero);
                    combined_output += cell.total_output;
                    values.insert(entity.info.id.clone(), cell);
                }
                ComparisonDimensionRow {
                    dimension_id,
                    dimension_code,
                    dimension_name,
                    combined_output,
                    values,
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.combined_output
                .cmp(&a.combined_output)
                .then_with(|| a.dimension_id.cmp(&b.dimension_id))
        });
        rows
    }
}

impl Default for ComparisonAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 维度轴
// ==========================================
#[derive(Debug, Clone, Copy)]
enum DimensionAxis {
    Product,
    Process,
}

impl DimensionAxis {
    /// 统一迭代两种维度行: (ID, 编码, 名称, 产量)
    fn rows<'a>(
        &self,
        report: &'a ProductionReport,
    ) -> Box<dyn Iterator<Item = (&'a str, &'a str, &'a str, i64)> + 'a> {
        match self {
            DimensionAxis::Product => Box::new(report.by_product.iter().map(|row| {
                (
                    row.handbag_id.as_str(),
                    row.handbag_code.as_str(),
                    row.handbag_name.as_str(),
                    row.total_output,
                )
            })),
            DimensionAxis::Process => Box::new(report.by_process.iter().map(|row| {
                (
                    row.process_id.as_str(),
                    row.process_code.as_str(),
                    row.process_name.as_str(),
                    row.total_output,
                )
            })),
        }
    }
}
