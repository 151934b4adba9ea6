// ==========================================
// 手袋工厂生产追踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报表结构
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod form;
pub mod report;
pub mod types;

// 重导出核心类型
pub use form::{DigitalForm, EntryCombination, FormEntry, ProductionIssue};
pub use report::{
    AttendanceCount, AttendanceSummary, ChildUnitSummary, ComparisonCell, ComparisonDailyRow,
    ComparisonDimensionRow, ComparisonReport, ComparisonSummaryRow, DailyBreakdownRow,
    HourlyBreakdownRow, IssueSummaryRow, ProcessBreakdownRow, ProductBreakdownRow,
    ProductionReport, ReportOptions, ReportScope, ReportTotals,
};
pub use types::{
    AttendanceStatus, ComparisonEntityKind, FormStatus, IssueType, OrgLevel, ShiftType, UserRole,
};
