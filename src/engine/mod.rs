// ==========================================
// 手袋工厂生产追踪系统 - 引擎层
// ==========================================
// 职责: 业务规则计算 (时段目录 / 聚合报表 / 对比分析)
// 红线: 引擎无状态, 不直接访问存储, 只对传入的数据集做纯计算
// ==========================================

pub mod aggregation;
pub mod comparison;
pub mod time_slot;

// 重导出核心引擎
pub use aggregation::{ChildDataset, DimensionNames, ReportAggregator};
pub use comparison::{ComparisonAssembler, EntityReport};
pub use time_slot::{
    empty_slots, expand_slots_for_shift, slot_count, slot_index, slot_labels, DroppedSlot,
    SlotExpansion,
};
