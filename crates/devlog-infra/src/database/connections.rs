use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::OnceCell;

use devlog_core::error::RepoError;

use super::document::PostDocument;

pub const POSTS_COLLECTION: &str = "posts";

/// Configuration for the MongoDB connection pool.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            max_pool_size: 100,
            min_pool_size: 10,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Process-wide MongoDB pool, connected lazily on first use.
///
/// The driver keeps its own connection pool inside [`Client`]. This type
/// only makes sure that client is built once, and that the `posts` indexes
/// exist before the first query runs. Clone the surrounding `Arc` to share
/// it between repositories.
pub struct MongoPool {
    config: MongoConfig,
    client: OnceCell<Client>,
}

impl MongoPool {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.config.database
    }

    /// Get the shared client, connecting on the first call.
    ///
    /// A failed attempt leaves the cell empty so the next request retries.
    pub async fn client(&self) -> Result<&Client, RepoError> {
        self.client.get_or_try_init(|| self.connect()).await
    }

    pub async fn database(&self) -> Result<Database, RepoError> {
        Ok(self.client().await?.database(&self.config.database))
    }

    pub async fn posts(&self) -> Result<Collection<PostDocument>, RepoError> {
        Ok(self.database().await?.collection(POSTS_COLLECTION))
    }

    async fn connect(&self) -> Result<Client, RepoError> {
        tracing::info!(database = %self.config.database, "Connecting to MongoDB...");

        let mut options = ClientOptions::parse(&self.config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        options.app_name = Some("devlog".to_string());
        options.max_pool_size = Some(self.config.max_pool_size);
        options.min_pool_size = Some(self.config.min_pool_size);
        options.connect_timeout = Some(self.config.connect_timeout);
        options.server_selection_timeout = Some(self.config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| RepoError::Connection(e.to_string()))?;
        Self::ensure_indexes(&client.database(&self.config.database)).await?;

        tracing::info!(
            "MongoDB connected (pool: {}-{})",
            self.config.min_pool_size,
            self.config.max_pool_size
        );
        Ok(client)
    }

    /// Unique slugs plus the sort keys used by listings.
    async fn ensure_indexes(db: &Database) -> Result<(), RepoError> {
        let posts = db.collection::<PostDocument>(POSTS_COLLECTION);
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "publishedAt": -1 })
                .build(),
        ];

        posts
            .create_indexes(indexes)
            .await
            .map_err(|e| RepoError::Connection(format!("failed to create indexes: {e}")))?;
        Ok(())
    }
}
