use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, ImageService, SeaOrmAuthService, SeaOrmCatalogService,
    SeaOrmStatsService, StatsService,
};

/// Everything a request handler needs, wired once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub catalog: Arc<dyn CatalogService>,

    pub stats: Arc<dyn StatsService>,

    pub auth: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let images = Arc::new(ImageService::new(config.general.images_path.clone()));

        let catalog: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone(), images));

        let stats: Arc<dyn StatsService> =
            Arc::new(SeaOrmStatsService::new(store.clone(), config.catalog.clone()));

        let auth: Arc<dyn AuthService> =
            Arc::new(SeaOrmAuthService::new(store, config.security.clone()));

        let config = Arc::new(RwLock::new(config));

        Ok(Self {
            config,
            catalog,
            stats,
            auth,
        })
    }
}
