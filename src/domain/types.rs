// ==========================================
// 手袋工厂生产追踪系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 表单状态 (Form Status)
// ==========================================
// 红线: 状态只能沿 DRAFT → PENDING → {CONFIRMED, REJECTED} 前进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    Draft,     // 草稿
    Pending,   // 待审核
    Confirmed, // 已确认
    Rejected,  // 已驳回
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FormStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PENDING" => FormStatus::Pending,
            "CONFIRMED" => FormStatus::Confirmed,
            "REJECTED" => FormStatus::Rejected,
            _ => FormStatus::Draft, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "DRAFT",
            FormStatus::Pending => "PENDING",
            FormStatus::Confirmed => "CONFIRMED",
            FormStatus::Rejected => "REJECTED",
        }
    }

    /// 判断是否为终态 (已确认/已驳回后不再变化)
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormStatus::Confirmed | FormStatus::Rejected)
    }
}

// ==========================================
// 班次类型 (Shift Type)
// ==========================================
// 红线: 班次嵌套 REGULAR ⊂ EXTENDED ⊂ OVERTIME,
//       每级在前一级之上追加固定的时段集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Regular,  // 正常班
    Extended, // 延长班
    Overtime, // 加班班
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftType::Regular => write!(f, "REGULAR"),
            ShiftType::Extended => write!(f, "EXTENDED"),
            ShiftType::Overtime => write!(f, "OVERTIME"),
        }
    }
}

impl ShiftType {
    /// 从字符串解析班次类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "EXTENDED" => ShiftType::Extended,
            "OVERTIME" => ShiftType::Overtime,
            _ => ShiftType::Regular, // 默认值
        }
    }

    /// 表单编码中的班次代码 (R/E/O)
    pub fn code(&self) -> &'static str {
        match self {
            ShiftType::Regular => "R",
            ShiftType::Extended => "E",
            ShiftType::Overtime => "O",
        }
    }
}

// ==========================================
// 出勤状态 (Attendance Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,    // 出勤
    Absent,     // 缺勤
    Late,       // 迟到
    EarlyLeave, // 早退
    OnLeave,    // 请假
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "PRESENT"),
            AttendanceStatus::Absent => write!(f, "ABSENT"),
            AttendanceStatus::Late => write!(f, "LATE"),
            AttendanceStatus::EarlyLeave => write!(f, "EARLY_LEAVE"),
            AttendanceStatus::OnLeave => write!(f, "ON_LEAVE"),
        }
    }
}

impl AttendanceStatus {
    /// 全部出勤状态 (报表分布按此顺序输出)
    pub const ALL: [AttendanceStatus; 5] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::EarlyLeave,
        AttendanceStatus::OnLeave,
    ];
}

// ==========================================
// 生产问题类型 (Production Issue Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Absent,           // 缺勤
    Late,             // 迟到
    WaitingMaterials, // 待料
    QualityIssue,     // 质量问题
    LostMaterials,    // 物料丢失
    Other,            // 其他
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Absent => write!(f, "ABSENT"),
            IssueType::Late => write!(f, "LATE"),
            IssueType::WaitingMaterials => write!(f, "WAITING_MATERIALS"),
            IssueType::QualityIssue => write!(f, "QUALITY_ISSUE"),
            IssueType::LostMaterials => write!(f, "LOST_MATERIALS"),
            IssueType::Other => write!(f, "OTHER"),
        }
    }
}

impl IssueType {
    /// 全部问题类型 (问题汇总同频次时按此顺序稳定输出)
    pub const ALL: [IssueType; 6] = [
        IssueType::Absent,
        IssueType::Late,
        IssueType::WaitingMaterials,
        IssueType::QualityIssue,
        IssueType::LostMaterials,
        IssueType::Other,
    ];

    /// 类型在 ALL 中的序号, 用作排序的最终决胜键
    pub fn ordinal(&self) -> usize {
        IssueType::ALL
            .iter()
            .position(|t| t == self)
            .unwrap_or(IssueType::ALL.len())
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 核心层只接收已鉴权的请求者角色, 不做认证
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Worker,      // 工人
    TeamLeader,  // 组长
    LineManager, // 线长
    Admin,       // 管理员
    SuperAdmin,  // 超级管理员
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Worker => write!(f, "WORKER"),
            UserRole::TeamLeader => write!(f, "TEAM_LEADER"),
            UserRole::LineManager => write!(f, "LINE_MANAGER"),
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::SuperAdmin => write!(f, "SUPER_ADMIN"),
        }
    }
}

impl UserRole {
    /// 判断是否为管理员级角色 (审批/驳回/强制编辑权限)
    pub fn is_admin_tier(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }

    /// 判断是否允许创建表单
    pub fn can_create_form(&self) -> bool {
        matches!(
            self,
            UserRole::TeamLeader | UserRole::LineManager | UserRole::Admin | UserRole::SuperAdmin
        )
    }
}

// ==========================================
// 组织层级 (Org Level)
// ==========================================
// 工厂 → 产线 → 班组 → 小组 → 工人
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgLevel {
    Factory, // 工厂
    Line,    // 产线
    Team,    // 班组
    Group,   // 小组
    Worker,  // 工人
}

impl fmt::Display for OrgLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgLevel::Factory => write!(f, "FACTORY"),
            OrgLevel::Line => write!(f, "LINE"),
            OrgLevel::Team => write!(f, "TEAM"),
            OrgLevel::Group => write!(f, "GROUP"),
            OrgLevel::Worker => write!(f, "WORKER"),
        }
    }
}

// ==========================================
// 对比实体类型 (Comparison Entity Kind)
// ==========================================
// 对比分析只支持同类实体: 班组之间或小组之间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonEntityKind {
    Team,  // 班组
    Group, // 小组
}

impl fmt::Display for ComparisonEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonEntityKind::Team => write!(f, "TEAM"),
            ComparisonEntityKind::Group => write!(f, "GROUP"),
        }
    }
}
