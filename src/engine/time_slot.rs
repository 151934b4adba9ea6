// ==========================================
// 手袋工厂生产追踪系统 - 班次时段目录
// ==========================================
// 职责: 班次 → 时段标签集合 的静态定义与扩缩规则
// 红线: 班次嵌套 REGULAR ⊂ EXTENDED ⊂ OVERTIME
// 红线: 收窄班次丢弃非零数据必须显式上报, 不得静默截断
// ==========================================

use std::collections::BTreeMap;

use crate::domain::types::ShiftType;

// ==========================================
// 时段定义
// ==========================================
// 正常班 8 个时段 (午休 11:30-12:30 不计)
const REGULAR_SLOTS: [&str; 8] = [
    "07:30-08:30",
    "08:30-09:30",
    "09:30-10:30",
    "10:30-11:30",
    "12:30-13:30",
    "13:30-14:30",
    "14:30-15:30",
    "15:30-16:30",
];

// 延长班在正常班之上追加 2 个时段
const EXTENDED_EXTRA: [&str; 2] = ["16:30-17:00", "17:00-18:00"];

// 加班班在延长班之上追加 2 个时段
const OVERTIME_EXTRA: [&str; 2] = ["18:00-19:00", "19:00-20:00"];

// ==========================================
// 时段查询
// ==========================================

/// 目标班次的完整时段标签列表 (有序)
pub fn slot_labels(shift: ShiftType) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = REGULAR_SLOTS.to_vec();
    if shift >= ShiftType::Extended {
        labels.extend_from_slice(&EXTENDED_EXTRA);
    }
    if shift >= ShiftType::Overtime {
        labels.extend_from_slice(&OVERTIME_EXTRA);
    }
    labels
}

/// 目标班次的时段数
pub fn slot_count(shift: ShiftType) -> usize {
    slot_labels(shift).len()
}

/// 标签在目标班次时段列表中的序号 (问题 hour_index 校验用)
pub fn slot_index(shift: ShiftType, label: &str) -> Option<usize> {
    slot_labels(shift).iter().position(|s| *s == label)
}

/// 目标班次的全零时段映射 (新建条目时播种)
pub fn empty_slots(shift: ShiftType) -> BTreeMap<String, i32> {
    slot_labels(shift)
        .into_iter()
        .map(|label| (label.to_string(), 0))
        .collect()
}

// ==========================================
// 班次扩缩
// ==========================================

/// 收窄班次时被丢弃的非零时段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSlot {
    pub label: String,
    pub output: i32,
}

/// 扩缩结果
#[derive(Debug, Clone)]
pub struct SlotExpansion {
    /// 目标班次的完整时段映射
    pub slots: BTreeMap<String, i32>,
    /// 被丢弃的非零时段 (零值时段丢弃不计)
    pub dropped: Vec<DroppedSlot>,
}

impl SlotExpansion {
    /// 是否存在已录入数据的丢失
    pub fn has_data_loss(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// 将已有时段映射扩缩到目标班次
///
/// 规则:
/// - 结果键集合恰好等于目标班次的时段集合
/// - 已有且仍属于目标班次的键保留原值
/// - 目标班次新增的键以 0 创建
/// - 不属于目标班次的键被丢弃; 其中非零值记入 dropped, 由调用方决定是否放行
pub fn expand_slots_for_shift(
    existing: &BTreeMap<String, i32>,
    shift: ShiftType,
) -> SlotExpansion {
    let target = slot_labels(shift);

    let slots: BTreeMap<String, i32> = target
        .iter()
        .map(|label| {
            let value = existing.get(*label).copied().unwrap_or(0);
            (label.to_string(), value)
        })
        .collect();

    let dropped: Vec<DroppedSlot> = existing
        .iter()
        .filter(|(label, value)| **value != 0 && !target.contains(&label.as_str()))
        .map(|(label, value)| DroppedSlot {
            label: label.clone(),
            output: *value,
        })
        .collect();

    SlotExpansion { slots, dropped }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_counts_per_tier() {
        assert_eq!(slot_count(ShiftType::Regular), 8);
        assert_eq!(slot_count(ShiftType::Extended), 10);
        assert_eq!(slot_count(ShiftType::Overtime), 12);
    }

    #[test]
    fn test_tiers_are_nested() {
        let regular = slot_labels(ShiftType::Regular);
        let extended = slot_labels(ShiftType::Extended);
        let overtime = slot_labels(ShiftType::Overtime);

        for label in &regular {
            assert!(extended.contains(label));
        }
        for label in &extended {
            assert!(overtime.contains(label));
        }
    }

    #[test]
    fn test_labels_sort_chronologically() {
        // BTreeMap 依赖 HH:MM 标签字典序即时间序
        let labels = slot_labels(ShiftType::Overtime);
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_empty_slots_all_zero() {
        let slots = empty_slots(ShiftType::Extended);
        assert_eq!(slots.len(), 10);
        assert!(slots.values().all(|v| *v == 0));
    }

    #[test]
    fn test_expand_upgrade_keeps_values_and_adds_zeros() {
        let mut existing = empty_slots(ShiftType::Regular);
        existing.insert("07:30-08:30".to_string(), 15);
        existing.insert("12:30-13:30".to_string(), 8);

        let result = expand_slots_for_shift(&existing, ShiftType::Overtime);

        // 键集合恰好等于目标班次集合
        let expected: Vec<String> = slot_labels(ShiftType::Overtime)
            .into_iter()
            .map(String::from)
            .collect();
        let actual: Vec<String> = result.slots.keys().cloned().collect();
        assert_eq!(actual, expected);

        // 双方共有的键保留原值
        assert_eq!(result.slots["07:30-08:30"], 15);
        assert_eq!(result.slots["12:30-13:30"], 8);
        // 新增键为 0
        assert_eq!(result.slots["18:00-19:00"], 0);
        assert!(!result.has_data_loss());
    }

    #[test]
    fn test_expand_downgrade_reports_nonzero_drops() {
        let mut existing = empty_slots(ShiftType::Overtime);
        existing.insert("07:30-08:30".to_string(), 10);
        existing.insert("17:00-18:00".to_string(), 5);
        existing.insert("18:00-19:00".to_string(), 7);

        let result = expand_slots_for_shift(&existing, ShiftType::Regular);

        assert_eq!(result.slots.len(), 8);
        assert_eq!(result.slots["07:30-08:30"], 10);
        assert!(result.has_data_loss());

        let mut dropped = result.dropped.clone();
        dropped.sort_by(|a, b| a.label.cmp(&b.label));
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0].label, "17:00-18:00");
        assert_eq!(dropped[0].output, 5);
        assert_eq!(dropped[1].label, "18:00-19:00");
        assert_eq!(dropped[1].output, 7);
    }

    #[test]
    fn test_expand_downgrade_zero_slots_drop_silently() {
        // 零值时段被丢弃不算数据丢失
        let existing = empty_slots(ShiftType::Overtime);
        let result = expand_slots_for_shift(&existing, ShiftType::Regular);
        assert_eq!(result.slots.len(), 8);
        assert!(!result.has_data_loss());
    }

    #[test]
    fn test_slot_index() {
        assert_eq!(slot_index(ShiftType::Regular, "07:30-08:30"), Some(0));
        assert_eq!(slot_index(ShiftType::Regular, "15:30-16:30"), Some(7));
        // 延长班时段不属于正常班
        assert_eq!(slot_index(ShiftType::Regular, "16:30-17:00"), None);
        assert_eq!(slot_index(ShiftType::Extended, "16:30-17:00"), Some(8));
    }
}
