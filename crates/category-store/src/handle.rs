//! SurrealDB-backed CategoryStore
//!
//! Supports in-memory (`mem://`), local file (`surrealkv://`) and remote
//! (WebSocket, optionally SurrealDB Cloud) connections. Every connection
//! path runs the idempotent schema initialization before returning.

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::migrations;
use crate::schema::{name_key, RepairCategory};
use crate::store::{validate_name, CategoryStore, StoreResult};

const DEFAULT_NAMESPACE: &str = "mecabot";
const DEFAULT_DATABASE: &str = "main";
const LOCAL_DB_PATH: &str = ".mecabot/db";

/// Configuration for a remote (SurrealDB Cloud or self-hosted) connection
#[derive(Clone)]
pub struct CloudConfig {
    /// WebSocket endpoint URL (e.g., "wss://xxx.aws-use1.surrealdb.cloud")
    pub endpoint: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Namespace (default: "mecabot")
    pub namespace: String,
    /// Database name (default: "main")
    pub database: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("is_root", &self.is_root)
            .finish()
    }
}

impl CloudConfig {
    /// Create a new configuration for a database user
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            is_root: false,
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Set whether this is a root user
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT (required)
    /// - SURREALDB_USERNAME (required)
    /// - SURREALDB_PASSWORD (required)
    /// - SURREALDB_NAMESPACE (optional, default: "mecabot")
    /// - SURREALDB_DATABASE (optional, default: "main")
    /// - SURREALDB_ROOT (optional, default: "false") - set to "true" for root users
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint =
            std::env::var("SURREALDB_ENDPOINT").map_err(|_| "SURREALDB_ENDPOINT not set")?;
        let username =
            std::env::var("SURREALDB_USERNAME").map_err(|_| "SURREALDB_USERNAME not set")?;
        let password =
            std::env::var("SURREALDB_PASSWORD").map_err(|_| "SURREALDB_PASSWORD not set")?;
        let namespace = std::env::var("SURREALDB_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let database =
            std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let is_root = std::env::var("SURREALDB_ROOT")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            username,
            password,
            namespace,
            database,
            is_root,
        })
    }
}

/// SurrealDB-backed implementation of [`CategoryStore`].
#[derive(Clone)]
pub struct SurrealCategoryStore {
    db: Surreal<Any>,
}

impl SurrealCategoryStore {
    /// Create an in-memory instance.
    ///
    /// Connects to `mem://`, selects `mecabot/main`, and runs `init_schema`.
    #[instrument(skip_all)]
    pub async fn in_memory() -> StoreResult<Self> {
        info!("Connecting to SurrealDB (in-memory)");
        Self::connect("mem://").await
    }

    /// Connect to an unauthenticated endpoint (`mem://`, `surrealkv://path`,
    /// `ws://host:port`) using the default namespace and database.
    #[instrument]
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        db.use_ns(DEFAULT_NAMESPACE)
            .use_db(DEFAULT_DATABASE)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        info!("Category store connected ({})", url);
        Ok(Self { db })
    }

    /// Connect to SurrealDB Cloud or any authenticated remote instance
    #[instrument(skip(config), fields(endpoint = %config.endpoint, namespace = %config.namespace, database = %config.database))]
    pub async fn setup_cloud(config: CloudConfig) -> StoreResult<Self> {
        info!("Connecting to SurrealDB Cloud (root={})", config.is_root);

        let db = surrealdb::engine::any::connect(&config.endpoint)
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
            })?;

        if config.is_root {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| StoreError::Connection(format!("Root authentication failed: {}", e)))?;
        } else {
            db.signin(Database {
                namespace: &config.namespace,
                database: &config.database,
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Database authentication failed: {}", e))
            })?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to select namespace/database: {}", e))
            })?;

        migrations::init_schema(&db).await?;

        info!("SurrealDB Cloud connected and schema initialized");
        Ok(Self { db })
    }

    /// Connect using environment variables
    ///
    /// If SURREALDB_ENDPOINT is set, connects to cloud.
    /// If SURREALDB_URL is set, connects to that URL.
    /// Otherwise, falls back to local persistence in `.mecabot/db`.
    #[instrument(skip_all)]
    pub async fn setup_from_env() -> StoreResult<Self> {
        if let Ok(config) = CloudConfig::from_env() {
            info!("Cloud config found, connecting to SurrealDB Cloud");
            return Self::setup_cloud(config).await;
        }

        if let Ok(url) = std::env::var("SURREALDB_URL") {
            info!("SURREALDB_URL found, connecting to {}", url);
            return Self::connect(&url).await;
        }

        std::fs::create_dir_all(LOCAL_DB_PATH).map_err(|e| {
            StoreError::Connection(format!(
                "Failed to create database directory {}: {}",
                LOCAL_DB_PATH, e
            ))
        })?;
        let url = format!("surrealkv://{}", LOCAL_DB_PATH);
        info!(
            "No cloud config or SURREALDB_URL found, using local persistence: {}",
            url
        );
        Self::connect(&url).await
    }
}

#[async_trait]
impl CategoryStore for SurrealCategoryStore {
    #[instrument(skip(self))]
    async fn find_by_name_case_insensitive(
        &self,
        name: &str,
    ) -> StoreResult<Option<RepairCategory>> {
        debug!("Looking up category");

        let mut result = self
            .db
            .query("SELECT * FROM repair_category WHERE name_key = $key")
            .bind(("key", name_key(name)))
            .await?;

        let rows: Vec<RepairCategory> = result.take(0)?;
        if rows.len() > 1 {
            // The unique index makes this unreachable unless the index was dropped.
            warn!(matches = rows.len(), "Multiple categories share a name key");
        }
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn save(&self, name: &str, avg_minutes: u32) -> StoreResult<RepairCategory> {
        validate_name(name)?;

        if self.find_by_name_case_insensitive(name).await?.is_some() {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }

        let record = RepairCategory::new(name, avg_minutes);
        let created: Option<RepairCategory> = self
            .db
            .create("repair_category")
            .content(record)
            .await
            .map_err(|e| {
                // Lost a race against a concurrent insert of the same key.
                let message = e.to_string();
                if message.contains("already contains") {
                    StoreError::DuplicateName {
                        name: name.to_string(),
                    }
                } else {
                    StoreError::Query(message)
                }
            })?;

        let created = created
            .ok_or_else(|| StoreError::Query("Failed to create category".to_string()))?;
        info!(name = %created.name, avg_minutes = created.avg_minutes, "Category saved");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<RepairCategory>> {
        let mut result = self
            .db
            .query("SELECT * FROM repair_category ORDER BY name")
            .await?;

        let rows: Vec<RepairCategory> = result.take(0)?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn remove(&self, name: &str) -> StoreResult<bool> {
        let mut result = self
            .db
            .query("DELETE FROM repair_category WHERE name_key = $key RETURN BEFORE")
            .bind(("key", name_key(name)))
            .await?;

        let removed: Vec<RepairCategory> = result.take(0)?;
        if !removed.is_empty() {
            info!("Category removed");
        }
        Ok(!removed.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_config_defaults() {
        let config = CloudConfig::new("wss://db.example.com", "svc", "pw");
        assert_eq!(config.namespace, "mecabot");
        assert_eq!(config.database, "main");
        assert!(!config.is_root);
    }

    #[test]
    fn test_cloud_config_builders() {
        let config = CloudConfig::new("wss://db.example.com", "svc", "pw")
            .with_namespace("taller")
            .with_database("prod")
            .with_root(true);
        assert_eq!(config.namespace, "taller");
        assert_eq!(config.database, "prod");
        assert!(config.is_root);
    }

    #[test]
    fn test_cloud_config_debug_redacts_password() {
        let config = CloudConfig::new("wss://db.example.com", "svc", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_in_memory_schema_is_idempotent() {
        let store = SurrealCategoryStore::in_memory().await.unwrap();
        migrations::init_schema(&store.db).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_uses_stored_display_name() {
        let store = SurrealCategoryStore::in_memory().await.unwrap();
        store.save("Cambio de batería", 45).await.unwrap();

        let found = store
            .find_by_name_case_insensitive("CAMBIO DE BATERÍA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Cambio de batería");
        assert_eq!(found.avg_minutes, 45);
        assert!(found.id.is_some());
    }
}
