// ==========================================
// 手袋工厂生产追踪系统 - 应用配置
// ==========================================
// 职责: 注入式配置值, 避免环境耦合
// 系统账号ID不得写死在业务代码里, 必须由部署环境注入
// ==========================================

use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 系统账号ID (外部审批回调等系统驱动的迁移以此身份记账)
    pub system_account_id: String,
    /// 列表查询默认页大小
    pub default_page_size: u32,
    /// 列表查询页大小上限
    pub max_page_size: u32,
    /// 报表缓存 TTL (秒)
    pub report_cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            system_account_id: "system".to_string(),
            default_page_size: 20,
            max_page_size: 100,
            report_cache_ttl_secs: 60,
        }
    }
}

impl AppConfig {
    /// 把请求页大小夹到配置上限内 (0 回退到默认值)
    pub fn clamp_page_size(&self, requested: u32) -> u32 {
        if requested == 0 {
            self.default_page_size
        } else {
            requested.min(self.max_page_size)
        }
    }
}
