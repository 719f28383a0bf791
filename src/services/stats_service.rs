//! Domain service for dashboard and home-page aggregations.
//!
//! Every call re-scans current store state; nothing is cached.

use thiserror::Error;

use crate::models::{Category, Element, Jutsu, Rank};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for StatsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Full dashboard payload.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total: u64,
    pub distinct_elements: u64,
    /// Most common element first; ties in store order.
    pub elements: Vec<(Element, u64)>,
    /// Most common category first; ties in store order.
    pub categories: Vec<(Category, u64)>,
    /// Rank declaration order (E through SS), regardless of counts.
    pub ranks: Vec<(Rank, u64)>,
    pub recent: Vec<Jutsu>,
}

/// Home page highlight reel.
#[derive(Debug, Clone)]
pub struct HomeHighlights {
    pub latest: Vec<Jutsu>,
    pub fire_picks: Vec<Jutsu>,
    pub water_picks: Vec<Jutsu>,
    pub high_rank_picks: Vec<Jutsu>,
    pub total: u64,
}

#[async_trait::async_trait]
pub trait StatsService: Send + Sync {
    async fn count_by_element(&self) -> Result<Vec<(Element, u64)>, StatsError>;

    async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, StatsError>;

    async fn count_by_rank(&self) -> Result<Vec<(Rank, u64)>, StatsError>;

    async fn recently_created(&self, n: u64) -> Result<Vec<Jutsu>, StatsError>;

    async fn distinct_element_count(&self) -> Result<u64, StatsError>;

    async fn total(&self) -> Result<u64, StatsError>;

    /// Assembles everything the dashboard shows in one call.
    async fn dashboard(&self) -> Result<Dashboard, StatsError>;

    /// Assembles the home page highlights. Element and high-rank picks are
    /// randomized per call.
    async fn home(&self) -> Result<HomeHighlights, StatsError>;
}
