pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Account, Profile, ProfileChanges, ProfileQuery};
use crate::utils::AppError;

pub const ACCOUNTS_COLLECTION: &str = "providers";
pub const PROFILES_COLLECTION: &str = "providersInfo";

/// Persistence handle injected into every handler.
///
/// Email lookups are case-insensitive exact matches. Nothing here enforces
/// uniqueness: callers check before inserting.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    async fn find_accounts_by_email(&self, email: &str) -> Result<Vec<Account>, AppError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self.find_accounts_by_email(email).await?.into_iter().next())
    }

    async fn insert_account(&self, account: Account) -> Result<Account, AppError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError>;

    async fn insert_profile(&self, profile: Profile) -> Result<Profile, AppError>;

    /// Returns the updated profile, or `None` when no profile matched.
    async fn update_profile(
        &self,
        email: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError>;

    async fn list_profiles(&self, query: &ProfileQuery) -> Result<Vec<Profile>, AppError>;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Releases connections at shutdown.
    async fn close(&self) {}
}

/// Opens the store named by `url`: `memory://` selects the in-process
/// store, anything else is handed to the MongoDB driver.
pub async fn connect(url: &str, database_name: &str) -> Result<Arc<dyn ProviderStore>, AppError> {
    if url.starts_with("memory://") {
        log::warn!("⚠️  Using in-memory store, data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = MongoDB::new(url, database_name).await?;
    Ok(Arc::new(db))
}
