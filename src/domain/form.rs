// ==========================================
// 手袋工厂生产追踪系统 - 数字表单领域模型
// ==========================================
// 职责: 数字表单 / 表单条目 / 生产问题 实体定义
// 红线: 实体不含数据访问逻辑, 不含引擎逻辑
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::{AttendanceStatus, FormStatus, IssueType, ShiftType};

// ==========================================
// DigitalForm - 数字生产表单
// ==========================================
// 一张表单对应 日期 + 班次 + 组织范围(工厂/产线/班组/小组)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalForm {
    pub form_id: String,                        // 表单ID
    pub form_code: String,                      // 表单编码 (PCD-YYMMDD-...)
    pub form_name: String,                      // 表单名称
    pub description: Option<String>,            // 描述
    pub date: NaiveDate,                        // 目标日期 (自然日, 非时间戳)
    pub shift_type: ShiftType,                  // 班次类型
    pub factory_id: String,                     // 工厂ID
    pub line_id: String,                        // 产线ID
    pub team_id: String,                        // 班组ID
    pub group_id: String,                       // 小组ID
    pub worker_id: Option<String>,              // 归属工人ID (可选)
    pub status: FormStatus,                     // 生命周期状态
    pub created_by: String,                     // 创建人
    pub updated_by: Option<String>,             // 最后更新人
    pub created_at: DateTime<Utc>,              // 创建时间
    pub updated_at: DateTime<Utc>,              // 更新时间
    pub submitted_at: Option<DateTime<Utc>>,    // 提交时间
    pub approved_at: Option<DateTime<Utc>>,     // 审批时间
    pub approval_request_id: Option<String>,    // 外部审批请求ID
    pub is_exported: bool,                      // 已导出标志
    pub is_synced: bool,                        // 已同步标志
}

impl DigitalForm {
    /// 判断是否为草稿状态
    pub fn is_draft(&self) -> bool {
        self.status == FormStatus::Draft
    }

    /// 判断是否为待审核状态
    pub fn is_pending(&self) -> bool {
        self.status == FormStatus::Pending
    }

    /// 判断内容是否可编辑 (仅草稿期允许增删改条目)
    pub fn content_editable(&self) -> bool {
        self.is_draft()
    }
}

// ==========================================
// EntryCombination - 条目唯一组合键
// ==========================================
// 红线: 同一表单内 (工人, 手袋, 颜色, 工序) 不得重复
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryCombination {
    pub user_id: String,      // 工人ID
    pub handbag_id: String,   // 手袋ID
    pub bag_color_id: String, // 颜色ID
    pub process_id: String,   // 工序ID
}

// ==========================================
// FormEntry - 表单条目
// ==========================================
// 一个条目记录一名工人在一张表单内对某 手袋+颜色+工序 的产出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEntry {
    pub entry_id: String,                       // 条目ID
    pub form_id: String,                        // 所属表单
    pub user_id: String,                        // 工人ID
    pub handbag_id: String,                     // 手袋ID
    pub bag_color_id: String,                   // 颜色ID
    pub process_id: String,                     // 工序ID
    pub planned_output: i32,                    // 计划产量
    // 时段产量: 时段标签 → 产量
    // BTreeMap: HH:MM 标签按字典序即时间序, 输出天然稳定
    pub hourly_data: BTreeMap<String, i32>,
    pub total_output: i32,                      // 总产量 (= Σ 时段产量, 除非显式覆盖)
    pub attendance_status: AttendanceStatus,    // 出勤状态
    pub shift_type: ShiftType,                  // 班次类型 (可与表单不同)
    pub check_in_time: Option<NaiveTime>,       // 签到时间
    pub check_out_time: Option<NaiveTime>,      // 签退时间
    pub attendance_note: Option<String>,        // 出勤备注
    pub issues: Vec<ProductionIssue>,           // 生产问题列表 (有序)
    pub quality_score: i32,                     // 质量评分 (0-100)
    pub quality_notes: Option<String>,          // 质量备注
    pub created_at: DateTime<Utc>,              // 创建时间
    pub updated_at: DateTime<Utc>,              // 更新时间
}

impl FormEntry {
    /// 取条目的唯一组合键
    pub fn combination(&self) -> EntryCombination {
        EntryCombination {
            user_id: self.user_id.clone(),
            handbag_id: self.handbag_id.clone(),
            bag_color_id: self.bag_color_id.clone(),
            process_id: self.process_id.clone(),
        }
    }

    /// 时段产量求和
    pub fn hourly_sum(&self) -> i32 {
        self.hourly_data.values().sum()
    }
}

// ==========================================
// ProductionIssue - 生产问题 (值对象)
// ==========================================
// 只随 FormEntry 存在, 不独立持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionIssue {
    pub issue_type: IssueType,       // 问题类型
    pub hour_index: i32,             // 发生时段序号 (0 起, 对应条目班次的时段列表)
    pub impact_percent: i32,         // 影响百分比 (0-100)
    pub description: Option<String>, // 描述
}
