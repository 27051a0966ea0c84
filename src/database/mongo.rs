use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::{ProviderStore, ACCOUNTS_COLLECTION, PROFILES_COLLECTION};
use crate::models::{Account, Profile, ProfileChanges, ProfileQuery};
use crate::utils::validation::{contains_pattern, exact_match_pattern};
use crate::utils::AppError;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, database_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("service-hunt".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(database_name);

        // Fail fast when the server is unreachable
        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("✅ Connected to MongoDB database: {}", database_name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Lookup indexes only. Email uniqueness stays an application check, so
    /// these are intentionally non-unique.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let indexes = [
            (ACCOUNTS_COLLECTION, doc! { "email": 1 }),
            (PROFILES_COLLECTION, doc! { "email": 1 }),
            (PROFILES_COLLECTION, doc! { "service": 1, "location": 1 }),
        ];

        for (collection, keys) in indexes {
            let description = format!("{}({:?})", collection, keys.keys().collect::<Vec<_>>());
            let model = IndexModel::builder().keys(keys).build();

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", description),
                Err(e) => log::warn!("   ⚠️  Could not create index {}: {}", description, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn accounts(&self) -> Collection<Account> {
        self.collection(ACCOUNTS_COLLECTION)
    }

    fn profiles(&self) -> Collection<Profile> {
        self.collection(PROFILES_COLLECTION)
    }

    fn email_filter(email: &str) -> Document {
        doc! { "email": { "$regex": exact_match_pattern(email), "$options": "i" } }
    }

    fn profile_filter(query: &ProfileQuery) -> Document {
        let mut filter = Document::new();
        if let Some(service) = &query.service {
            filter.insert(
                "service",
                doc! { "$regex": exact_match_pattern(service), "$options": "i" },
            );
        }
        if let Some(location) = &query.location {
            filter.insert(
                "location",
                doc! { "$regex": contains_pattern(location), "$options": "i" },
            );
        }
        filter
    }
}

#[async_trait]
impl ProviderStore for MongoDB {
    async fn find_accounts_by_email(&self, email: &str) -> Result<Vec<Account>, AppError> {
        let cursor = self.accounts().find(Self::email_filter(email)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self.accounts().find_one(Self::email_filter(email)).await?)
    }

    async fn insert_account(&self, mut account: Account) -> Result<Account, AppError> {
        let result = self.accounts().insert_one(&account).await?;
        account.id = result.inserted_id.as_object_id();
        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let cursor = self.accounts().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles().find_one(Self::email_filter(email)).await?)
    }

    async fn insert_profile(&self, mut profile: Profile) -> Result<Profile, AppError> {
        let result = self.profiles().insert_one(&profile).await?;
        profile.id = result.inserted_id.as_object_id();
        Ok(profile)
    }

    async fn update_profile(
        &self,
        email: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        let set = mongodb::bson::to_document(changes)?;

        Ok(self
            .profiles()
            .find_one_and_update(Self::email_filter(email), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn list_profiles(&self, query: &ProfileQuery) -> Result<Vec<Profile>, AppError> {
        let cursor = self.profiles().find(Self::profile_filter(query)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) {
        log::info!("🔌 Closing MongoDB connections");
        self.client.clone().shutdown().await;
    }
}
