use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::ProviderStore;
use crate::models::{Account, Profile, ProfileChanges, ProfileQuery};
use crate::utils::validation::eq_ignore_case;
use crate::utils::AppError;

/// In-process store with the same matching rules as the MongoDB store.
/// Used by the test suite and for running without a database.
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<Vec<Account>>,
    profiles: RwLock<Vec<Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderStore for MemoryStore {
    async fn find_accounts_by_email(&self, email: &str) -> Result<Vec<Account>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .filter(|a| eq_ignore_case(&a.email, email))
            .cloned()
            .collect())
    }

    async fn insert_account(&self, mut account: Account) -> Result<Account, AppError> {
        account.id = Some(ObjectId::new());
        self.accounts.write().await.push(account.clone());
        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts.read().await.clone())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| eq_ignore_case(&p.email, email)).cloned())
    }

    async fn insert_profile(&self, mut profile: Profile) -> Result<Profile, AppError> {
        profile.id = Some(ObjectId::new());
        self.profiles.write().await.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        email: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles
            .iter_mut()
            .find(|p| eq_ignore_case(&p.email, email))
            .map(|profile| {
                changes.apply_to(profile);
                profile.clone()
            }))
    }

    async fn list_profiles(&self, query: &ProfileQuery) -> Result<Vec<Profile>, AppError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().filter(|p| query.matches(p)).cloned().collect())
    }
}
