//! `SeaORM` implementation of the `StatsService` trait.

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::config::CatalogConfig;
use crate::db::Store;
use crate::models::{Category, Element, Jutsu, Rank};
use crate::services::stats_service::{Dashboard, HomeHighlights, StatsError, StatsService};

pub struct SeaOrmStatsService {
    store: Store,
    catalog: CatalogConfig,
}

impl SeaOrmStatsService {
    #[must_use]
    pub const fn new(store: Store, catalog: CatalogConfig) -> Self {
        Self { store, catalog }
    }

    fn pick_random(pool: &[Jutsu], amount: usize) -> Vec<Jutsu> {
        let mut rng = rand::rng();
        pool.choose_multiple(&mut rng, amount).cloned().collect()
    }
}

#[async_trait]
impl StatsService for SeaOrmStatsService {
    async fn count_by_element(&self) -> Result<Vec<(Element, u64)>, StatsError> {
        Ok(self.store.count_by_element().await?)
    }

    async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, StatsError> {
        Ok(self.store.count_by_category().await?)
    }

    async fn count_by_rank(&self) -> Result<Vec<(Rank, u64)>, StatsError> {
        Ok(self.store.count_by_rank().await?)
    }

    async fn recently_created(&self, n: u64) -> Result<Vec<Jutsu>, StatsError> {
        Ok(self.store.recently_created(n).await?)
    }

    async fn distinct_element_count(&self) -> Result<u64, StatsError> {
        let counts = self.store.count_by_element().await?;
        Ok(counts.len() as u64)
    }

    async fn total(&self) -> Result<u64, StatsError> {
        Ok(self.store.total_jutsus().await?)
    }

    async fn dashboard(&self) -> Result<Dashboard, StatsError> {
        let elements = self.store.count_by_element().await?;
        let categories = self.store.count_by_category().await?;
        let ranks = self.store.count_by_rank().await?;
        let recent = self.store.recently_created(self.catalog.recent_limit).await?;
        let total = self.store.total_jutsus().await?;

        Ok(Dashboard {
            total,
            distinct_elements: elements.len() as u64,
            elements,
            categories,
            ranks,
            recent,
        })
    }

    async fn home(&self) -> Result<HomeHighlights, StatsError> {
        let latest = self
            .store
            .recently_created(self.catalog.home_latest_limit)
            .await?;

        let fire_pool = self.store.jutsus_by_element(Element::Fire).await?;
        let water_pool = self.store.jutsus_by_element(Element::Water).await?;
        let high_pool = self.store.jutsus_by_ranks(&Rank::HIGH).await?;
        let total = self.store.total_jutsus().await?;

        Ok(HomeHighlights {
            latest,
            fire_picks: Self::pick_random(&fire_pool, self.catalog.home_element_picks),
            water_picks: Self::pick_random(&water_pool, self.catalog.home_element_picks),
            high_rank_picks: Self::pick_random(&high_pool, self.catalog.home_high_rank_picks),
            total,
        })
    }
}
