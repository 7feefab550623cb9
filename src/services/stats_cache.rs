use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache de estatísticas com TTL fixo
/// Guarda os últimos valores buscados do GitHub ("issues" e "stars")
#[derive(Debug, Clone)]
pub struct StatsCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: DateTime<Utc>,
}

impl StatsCache {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Valor da chave, se presente e dentro do TTL
    /// Entradas expiradas são tratadas como ausentes
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        let age = Utc::now() - entry.stored_at;
        if age < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Substitui o valor da chave por inteiro, com expiração = agora + TTL
    pub async fn set(&self, key: &str, value: Value) {
        self.set_at(key, value, Utc::now()).await;
    }

    /// Insere com timestamp explícito (testes com relógio controlado)
    pub async fn set_at(&self, key: &str, value: Value, stored_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry { value, stored_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = StatsCache::new(900);

        cache.set("stars", json!(42)).await;

        assert_eq!(cache.get("stars").await, Some(json!(42)));
        assert_eq!(cache.get("issues").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent() {
        let cache = StatsCache::new(900);

        let expired = Utc::now() - Duration::seconds(901);
        cache.set_at("stars", json!(42), expired).await;

        assert_eq!(cache.get("stars").await, None);
    }

    #[tokio::test]
    async fn test_entry_within_ttl_is_present() {
        let cache = StatsCache::new(900);

        let almost_expired = Utc::now() - Duration::seconds(899);
        cache.set_at("stars", json!(42), almost_expired).await;

        assert_eq!(cache.get("stars").await, Some(json!(42)));
    }

    #[tokio::test]
    async fn test_set_overwrites_wholesale() {
        let cache = StatsCache::new(900);

        cache.set("issues", json!([{"title": "a"}])).await;
        cache.set("issues", json!([{"title": "b"}])).await;

        assert_eq!(cache.get("issues").await, Some(json!([{"title": "b"}])));
    }

    #[tokio::test]
    async fn test_set_refreshes_expired_entry() {
        let cache = StatsCache::new(900);

        let expired = Utc::now() - Duration::seconds(1000);
        cache.set_at("stars", json!(1), expired).await;
        assert_eq!(cache.get("stars").await, None);

        cache.set("stars", json!(2)).await;
        assert_eq!(cache.get("stars").await, Some(json!(2)));
    }
}
