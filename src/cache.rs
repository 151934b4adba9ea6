// ==========================================
// 手袋工厂生产追踪系统 - 报表缓存抽象
// ==========================================
// 职责: 查询参数为键的短时读穿缓存接口 + 进程内参考实现
// 红线: 任何底层实体写入后按标签整批失效, 核心层不关心具体缓存技术
// ==========================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ==========================================
// 缓存标签 (按资源种类整批失效)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Forms,   // 表单/条目查询
    Reports, // 聚合/对比报表
}

impl CacheTag {
    /// 标签字符串 (缓存键前缀)
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Forms => "forms",
            CacheTag::Reports => "reports",
        }
    }
}

// ==========================================
// ReportCache Trait
// ==========================================
#[async_trait]
pub trait ReportCache: Send + Sync {
    /// 读取缓存值 (过期视为不存在)
    async fn get(&self, key: &str) -> Option<String>;

    /// 写入缓存值
    async fn put(&self, key: &str, value: String, tag: CacheTag, ttl: Duration);

    /// 按标签整批失效
    async fn invalidate_tag(&self, tag: CacheTag);
}

// ==========================================
// MemoryCache - 进程内参考实现
// ==========================================
// 用途: 测试与单机部署; 生产环境可替换为任何支持标签失效的缓存
struct CacheEntry {
    value: String,
    tag: CacheTag,
    expires_at: Instant,
}

pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                // 过期条目顺手清除
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: &str, value: String, tag: CacheTag, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                tag,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn invalidate_tag(&self, tag: CacheTag) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| entry.tag != tag);
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let cache = MemoryCache::new();
        cache
            .put(
                "reports:team:T1",
                "{}".to_string(),
                CacheTag::Reports,
                Duration::from_secs(60),
            )
            .await;
        assert_eq!(cache.get("reports:team:T1").await, Some("{}".to_string()));
        assert_eq!(cache.get("reports:team:T2").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_gone() {
        let cache = MemoryCache::new();
        cache
            .put(
                "k",
                "v".to_string(),
                CacheTag::Reports,
                Duration::from_millis(0),
            )
            .await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_tag_only_hits_that_tag() {
        let cache = MemoryCache::new();
        cache
            .put(
                "r1",
                "a".to_string(),
                CacheTag::Reports,
                Duration::from_secs(60),
            )
            .await;
        cache
            .put(
                "f1",
                "b".to_string(),
                CacheTag::Forms,
                Duration::from_secs(60),
            )
            .await;

        cache.invalidate_tag(CacheTag::Reports).await;

        assert_eq!(cache.get("r1").await, None);
        assert_eq!(cache.get("f1").await, Some("b".to_string()));
    }
}
