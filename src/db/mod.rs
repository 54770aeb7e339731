//! Account configuration storage.
//!
//! The engine only sees [`ConfigStore`]: a key-value store of
//! [`AccountConfig`] by account id. Writes are last-writer-wins.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::AccountConfig;

pub use memory::MemoryStore;
pub use sqlite::Database;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Stored configuration for `account`, if one was ever saved.
    async fn get(&self, account: &str) -> StoreResult<Option<AccountConfig>>;

    /// Replace the configuration for `account`. The first `created_at`
    /// written for an account is kept.
    async fn set(&self, account: &str, config: &AccountConfig) -> StoreResult<()>;
}
