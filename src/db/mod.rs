use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::{Category, Element, Jutsu, JutsuDraft, JutsuFilter, JutsuPatch, Page, Rank};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn jutsu_repo(&self) -> repositories::jutsu::JutsuRepository {
        repositories::jutsu::JutsuRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ----- jutsus -----

    pub async fn create_jutsu(
        &self,
        draft: &JutsuDraft,
        image: Option<String>,
        now: &str,
    ) -> Result<Jutsu, DbErr> {
        self.jutsu_repo().create(draft, image, now).await
    }

    pub async fn get_jutsu(&self, id: i32) -> Result<Option<Jutsu>, DbErr> {
        self.jutsu_repo().get(id).await
    }

    pub async fn update_jutsu(
        &self,
        id: i32,
        patch: &JutsuPatch,
        now: &str,
    ) -> Result<Option<Jutsu>, DbErr> {
        self.jutsu_repo().update(id, patch, now).await
    }

    pub async fn set_jutsu_image(
        &self,
        id: i32,
        image: Option<String>,
        now: &str,
    ) -> Result<Option<Jutsu>, DbErr> {
        self.jutsu_repo().set_image(id, image, now).await
    }

    pub async fn delete_jutsu(&self, id: i32) -> Result<bool, DbErr> {
        self.jutsu_repo().delete(id).await
    }

    pub async fn list_jutsus(&self, filter: &JutsuFilter) -> Result<Page, DbErr> {
        self.jutsu_repo().list(filter).await
    }

    pub async fn total_jutsus(&self) -> Result<u64, DbErr> {
        self.jutsu_repo().total().await
    }

    pub async fn count_by_element(&self) -> Result<Vec<(Element, u64)>, DbErr> {
        self.jutsu_repo().count_by_element().await
    }

    pub async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, DbErr> {
        self.jutsu_repo().count_by_category().await
    }

    pub async fn count_by_rank(&self) -> Result<Vec<(Rank, u64)>, DbErr> {
        self.jutsu_repo().count_by_rank().await
    }

    pub async fn recently_created(&self, n: u64) -> Result<Vec<Jutsu>, DbErr> {
        self.jutsu_repo().recently_created(n).await
    }

    pub async fn jutsus_by_element(&self, element: Element) -> Result<Vec<Jutsu>, DbErr> {
        self.jutsu_repo().by_element(element).await
    }

    pub async fn jutsus_by_ranks(&self, ranks: &[Rank]) -> Result<Vec<Jutsu>, DbErr> {
        self.jutsu_repo().by_ranks(ranks).await
    }

    // ----- users -----

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }
}
