// ==========================================
// 集成测试辅助
// ==========================================
// 标准组织树 + API 装配 + 常用请求构造器
// ==========================================
#![allow(dead_code)]

pub mod memory;

use std::sync::Arc;

use chrono::NaiveDate;
use handbag_tracking::api::form_api::{Actor, AddEntryRequest, CreateFormRequest, FormApi};
use handbag_tracking::api::report_api::ReportApi;
use handbag_tracking::cache::MemoryCache;
use handbag_tracking::config::AppConfig;
use handbag_tracking::domain::form::DigitalForm;
use handbag_tracking::domain::types::{AttendanceStatus, ShiftType, UserRole};

use memory::{
    MemoryEntryRepository, MemoryFormRepository, MemoryOrgDirectory, MemoryProductDirectory,
};

// ==========================================
// 测试环境
// ==========================================
// 标准组织树:
//   工厂 F1(HF1)
//     产线 L1(L01): 班组 T1(T01), T2(T02)
//       T1: 小组 G1(G01){W1,W2}, G2(G02){W3,W4}
//       T2: 小组 G3(G03){W5}
//     产线 L2(L02): (空)
// 产品: 手袋 HB1(B01 托特包), HB2(B02 斜挎包)
// 工序: P1(PR01 裁剪), P2(PR02 缝制)
pub struct TestEnv {
    pub form_api: FormApi,
    pub report_api: ReportApi,
    pub cache: Arc<MemoryCache>,
    pub form_repo: Arc<MemoryFormRepository>,
    pub entry_repo: Arc<MemoryEntryRepository>,
}

impl TestEnv {
    pub fn new() -> Self {
        let mut org = MemoryOrgDirectory::new();
        org.add_factory("F1", "HF1", "一厂");
        org.add_line("F1", "L1", "L01", "一线");
        org.add_line("F1", "L2", "L02", "二线");
        org.add_team("L1", "T1", "T01", "一班");
        org.add_team("L1", "T2", "T02", "二班");
        org.add_group("T1", "G1", "G01", "一组");
        org.add_group("T1", "G2", "G02", "二组");
        org.add_group("T2", "G3", "G03", "三组");
        org.add_worker("G1", "W1", "E001", "张三");
        org.add_worker("G1", "W2", "E002", "李四");
        org.add_worker("G2", "W3", "E003", "王五");
        org.add_worker("G2", "W4", "E004", "赵六");
        org.add_worker("G3", "W5", "E005", "孙七");

        let mut products = MemoryProductDirectory::new();
        products.add_handbag("HB1", "B01", "托特包");
        products.add_handbag("HB2", "B02", "斜挎包");
        products.add_process("P1", "PR01", "裁剪");
        products.add_process("P2", "PR02", "缝制");

        let form_repo = Arc::new(MemoryFormRepository::new());
        let entry_repo = Arc::new(MemoryEntryRepository::new());
        entry_repo.set_group_members("G1", &["W1", "W2"]);
        entry_repo.set_group_members("G2", &["W3", "W4"]);
        entry_repo.set_group_members("G3", &["W5"]);

        let org = Arc::new(org);
        let products = Arc::new(products);
        let cache = Arc::new(MemoryCache::new());
        let config = AppConfig::default();

        let form_api = FormApi::new(
            form_repo.clone(),
            entry_repo.clone(),
            org.clone(),
            cache.clone(),
            config.clone(),
        );
        let report_api = ReportApi::new(
            form_repo.clone(),
            entry_repo.clone(),
            org,
            products,
            cache.clone(),
            config,
        );

        Self {
            form_api,
            report_api,
            cache,
            form_repo,
            entry_repo,
        }
    }
}

// ==========================================
// 请求者
// ==========================================

pub fn admin() -> Actor {
    Actor::new("admin-1", UserRole::Admin)
}

pub fn team_leader() -> Actor {
    Actor::new("leader-1", UserRole::TeamLeader)
}

pub fn plain_worker() -> Actor {
    Actor::new("worker-1", UserRole::Worker)
}

// ==========================================
// 请求构造器
// ==========================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 默认范围 (F1/L1/T1/G1, 正常班) 的建表请求
pub fn create_request(target_date: NaiveDate) -> CreateFormRequest {
    create_request_for("T1", "G1", target_date)
}

pub fn create_request_for(team_id: &str, group_id: &str, target_date: NaiveDate) -> CreateFormRequest {
    CreateFormRequest {
        form_name: "日产量表".to_string(),
        description: None,
        date: target_date,
        shift_type: ShiftType::Regular,
        factory_id: "F1".to_string(),
        line_id: "L1".to_string(),
        team_id: team_id.to_string(),
        group_id: group_id.to_string(),
        worker_id: None,
    }
}

/// 最小条目请求 (时段缺省播种全零)
pub fn entry_request(user_id: &str, handbag_id: &str, color_id: &str, process_id: &str) -> AddEntryRequest {
    AddEntryRequest {
        user_id: user_id.to_string(),
        handbag_id: handbag_id.to_string(),
        bag_color_id: color_id.to_string(),
        process_id: process_id.to_string(),
        planned_output: 0,
        hourly_data: None,
        total_output: None,
        attendance_status: AttendanceStatus::Present,
        shift_type: None,
        check_in_time: None,
        check_out_time: None,
        attendance_note: None,
        issues: vec![],
        quality_score: 100,
        quality_notes: None,
    }
}

/// 建一张草稿表单
pub async fn create_draft_form(env: &TestEnv, actor: &Actor, target_date: NaiveDate) -> DigitalForm {
    env.form_api
        .create_form(actor, create_request(target_date))
        .await
        .expect("创建表单失败")
}

/// 给表单播一条带产量/计划的条目 (产量走显式覆盖)
pub async fn seed_entry(
    env: &TestEnv,
    form_id: &str,
    user_id: &str,
    handbag_id: &str,
    process_id: &str,
    output: i32,
    planned: i32,
) {
    let mut request = entry_request(user_id, handbag_id, "C1", process_id);
    request.planned_output = planned;
    request.total_output = Some(output);
    env.form_api
        .add_entry(&admin(), form_id, request)
        .await
        .expect("播种条目失败");
}
