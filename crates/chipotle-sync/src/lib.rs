//! Sync pipeline orchestration: search, fetch and persist, normalize, load.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chipotle_client::{search_all, CatalogApi, ChipotleClient, ClientConfig, DEFAULT_BASE_URL};
use chipotle_core::{optimize_items, SearchQuery};
use chipotle_store::{CatalogWriter, SqliteCatalogStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

pub mod scheduler;

pub use scheduler::{fetch_menus, FetchOutcome, DEFAULT_FETCH_WORKERS};

pub const CRATE_NAME: &str = "chipotle-sync";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_key: String,
    pub base_url: String,
    pub db_path: PathBuf,
    pub fetch_workers: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// YAML search query replacing the nationwide default.
    pub query_file: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("CHIPOTLE_API_KEY").unwrap_or_default(),
            base_url: lookup("CHIPOTLE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            db_path: lookup("CHIPOTLE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./chipotle.db")),
            fetch_workers: lookup("CHIPOTLE_FETCH_WORKERS")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_FETCH_WORKERS)
                .max(1),
            http_timeout_secs: lookup("CHIPOTLE_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            user_agent: lookup("CHIPOTLE_USER_AGENT")
                .unwrap_or_else(|| "chipotle-menu-harvester/0.1".to_string()),
            query_file: lookup("CHIPOTLE_QUERY_FILE").map(PathBuf::from),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            user_agent: Some(self.user_agent.clone()),
        }
    }

    pub fn search_query(&self) -> Result<SearchQuery> {
        match &self.query_file {
            Some(path) => load_query_file(path),
            None => Ok(SearchQuery::nationwide()),
        }
    }
}

pub fn load_query_file(path: &Path) -> Result<SearchQuery> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading query file {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing query file {}", path.display()))
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub restaurants: usize,
    pub persisted_restaurants: usize,
    pub menus: usize,
    pub failed_menus: usize,
    pub items: usize,
    pub item_types: usize,
    pub item_categories: usize,
    pub item_names: usize,
    pub primary_filling_names: usize,
    pub content_groups: usize,
    pub database_path: String,
}

pub struct SyncPipeline<A: ?Sized, W> {
    config: SyncConfig,
    api: Arc<A>,
    writer: Arc<Mutex<W>>,
}

impl SyncPipeline<ChipotleClient, SqliteCatalogStore> {
    pub fn from_config(config: SyncConfig) -> Result<Self> {
        let client = ChipotleClient::new(config.client_config()).context("building catalog client")?;
        let store = SqliteCatalogStore::new(config.db_path.clone());
        Ok(Self::new(config, Arc::new(client), store))
    }
}

impl<A, W> SyncPipeline<A, W>
where
    A: CatalogApi + ?Sized + 'static,
    W: CatalogWriter + 'static,
{
    pub fn new(config: SyncConfig, api: Arc<A>, writer: W) -> Self {
        Self {
            config,
            api,
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs every phase in order. Each phase starts only after the previous
    /// one has fully completed; any error other than a skipped menu ends the run.
    pub async fn run_once(&self) -> Result<SyncRunSummary> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let query = self.config.search_query()?;

        info!(%run_id, "searching restaurants");
        let restaurants = search_all(self.api.as_ref(), &query)
            .await
            .context("searching restaurants")?;
        let restaurant_count = restaurants.len();
        info!(restaurants = restaurant_count, "search complete");

        info!(path = %self.config.db_path.display(), "preparing store");
        self.writer
            .lock()
            .await
            .prepare()
            .await
            .context("preparing store")?;

        info!(workers = self.config.fetch_workers, "fetching menus and inserting restaurants");
        let fetched = fetch_menus(
            Arc::clone(&self.api),
            Arc::clone(&self.writer),
            restaurants,
            self.config.fetch_workers,
        )
        .await?;
        if fetched.failed_menus > 0 {
            warn!(failed = fetched.failed_menus, "some menus could not be fetched");
        }

        info!(menus = fetched.menus.len(), "optimizing items");
        let mut items = optimize_items(&fetched.menus);

        let writer = self.writer.lock().await;
        info!(items = items.items().len(), "inserting optimized items");
        writer
            .insert_optimized_items(&items)
            .await
            .context("inserting optimized items")?;

        info!(menus = fetched.menus.len(), "inserting menus");
        for menu in &fetched.menus {
            writer
                .insert_menu(menu, &mut items)
                .await
                .with_context(|| format!("inserting menu for restaurant {}", menu.restaurant_id))?;
        }

        info!("finishing store");
        writer.finish().await.context("finishing store")?;
        drop(writer);

        let summary = SyncRunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            restaurants: restaurant_count,
            persisted_restaurants: fetched.persisted_restaurants,
            menus: fetched.menus.len(),
            failed_menus: fetched.failed_menus,
            items: items.items().len(),
            item_types: items.item_types.len(),
            item_categories: items.item_categories.len(),
            item_names: items.item_names.len(),
            primary_filling_names: items.primary_filling_names.len(),
            content_groups: items.content_groups.len(),
            database_path: self.config.db_path.display().to_string(),
        };
        info!(%run_id, menus = summary.menus, failed = summary.failed_menus, "sync complete");
        Ok(summary)
    }
}

pub async fn run_sync_once(config: SyncConfig) -> Result<SyncRunSummary> {
    if config.api_key.is_empty() {
        warn!("CHIPOTLE_API_KEY is not set; requests will be rejected upstream");
    }
    SyncPipeline::from_config(config)?.run_once().await
}

pub async fn run_sync_once_from_env() -> Result<SyncRunSummary> {
    run_sync_once(SyncConfig::from_env()).await
}
