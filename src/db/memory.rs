//! In-process configuration store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::AccountConfig;

use super::{ConfigStore, StoreResult};

/// Configuration kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    configs: RwLock<HashMap<String, AccountConfig>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, account: &str) -> StoreResult<Option<AccountConfig>> {
        Ok(self.configs.read().await.get(account).cloned())
    }

    async fn set(&self, account: &str, config: &AccountConfig) -> StoreResult<()> {
        let mut configs = self.configs.write().await;
        let created_at = configs
            .get(account)
            .map_or(config.created_at, |existing| existing.created_at);

        configs.insert(
            account.to_string(),
            AccountConfig {
                created_at,
                ..config.clone()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_account() {
        let store = MemoryStore::new();
        assert!(store.get("default").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins_and_created_at_kept() {
        let store = MemoryStore::new();
        let first = AccountConfig::new(10_000.0, 2.0);
        store.set("default", &first).await.unwrap();

        let second = AccountConfig::new(15_000.0, 1.5);
        store.set("default", &second).await.unwrap();

        let stored = store.get("default").await.unwrap().unwrap();
        assert_eq!(stored.total_capital, 15_000.0);
        assert_eq!(stored.risk_per_trade_percentage, 1.5);
        assert_eq!(stored.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_accounts_are_independent() {
        let store = MemoryStore::new();
        store.set("a", &AccountConfig::new(1_000.0, 1.0)).await.unwrap();
        assert!(store.get("b").await.unwrap().is_none());
    }
}
