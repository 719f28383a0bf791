//! `SeaORM` implementation of the `CatalogService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tracing::warn;

use crate::db::Store;
use crate::models::{Jutsu, JutsuDraft, JutsuFilter, JutsuPatch, Page};
use crate::services::ImageService;
use crate::services::catalog_service::{
    CatalogError, CatalogService, FieldError, validate_description, validate_name,
};

pub struct SeaOrmCatalogService {
    store: Store,
    images: Arc<ImageService>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>) -> Self {
        Self { store, images }
    }

    /// The unique constraint on `name` arbitrates concurrent writers; the
    /// losing insert/update surfaces here as a constraint violation.
    fn map_write_err(err: DbErr, name: &str) -> CatalogError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CatalogError::DuplicateName(name.to_string())
            }
            _ => err.into(),
        }
    }

    async fn remove_asset(&self, filename: &str) {
        if let Err(e) = self.images.remove(filename).await {
            warn!("Failed to remove image asset {}: {}", filename, e);
        }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn create(&self, draft: JutsuDraft) -> Result<Jutsu, CatalogError> {
        let errors: Vec<FieldError> = validate_name(&draft.name)
            .into_iter()
            .chain(validate_description(&draft.description))
            .collect();
        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        let image = match &draft.image_url {
            Some(url) => Some(
                self.images
                    .fetch(url)
                    .await
                    .map_err(|e| CatalogError::ImageFetch(e.to_string()))?,
            ),
            None => None,
        };

        let now = chrono::Utc::now().to_rfc3339();
        match self.store.create_jutsu(&draft, image.clone(), &now).await {
            Ok(jutsu) => Ok(jutsu),
            Err(err) => {
                // The insert lost; don't leave its freshly fetched asset behind.
                if let Some(filename) = &image {
                    self.remove_asset(filename).await;
                }
                Err(Self::map_write_err(err, &draft.name))
            }
        }
    }

    async fn get(&self, id: i32) -> Result<Jutsu, CatalogError> {
        self.store
            .get_jutsu(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn update(&self, id: i32, patch: JutsuPatch) -> Result<Jutsu, CatalogError> {
        let mut errors: Vec<FieldError> = Vec::new();
        if let Some(name) = &patch.name {
            errors.extend(validate_name(name));
        }
        if let Some(description) = &patch.description {
            errors.extend(validate_description(description));
        }
        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let updated = self
            .store
            .update_jutsu(id, &patch, &now)
            .await
            .map_err(|e| Self::map_write_err(e, patch.name.as_deref().unwrap_or_default()))?;

        updated.ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let jutsu = self
            .store
            .get_jutsu(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let removed = self.store.delete_jutsu(id).await?;
        if !removed {
            return Err(CatalogError::NotFound(id));
        }

        if let Some(filename) = &jutsu.image {
            self.remove_asset(filename).await;
        }

        Ok(())
    }

    async fn list(&self, filter: JutsuFilter) -> Result<Page, CatalogError> {
        Ok(self.store.list_jutsus(&filter).await?)
    }

    async fn attach_image(&self, id: i32, url: &str) -> Result<Jutsu, CatalogError> {
        let existing = self
            .store
            .get_jutsu(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let filename = self
            .images
            .fetch(url)
            .await
            .map_err(|e| CatalogError::ImageFetch(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let updated = self
            .store
            .set_jutsu_image(id, Some(filename.clone()), &now)
            .await?;

        let Some(jutsu) = updated else {
            // Record vanished between lookup and write.
            self.remove_asset(&filename).await;
            return Err(CatalogError::NotFound(id));
        };

        if let Some(old) = &existing.image {
            self.remove_asset(old).await;
        }

        Ok(jutsu)
    }

    async fn detach_image(&self, id: i32) -> Result<Jutsu, CatalogError> {
        let existing = self
            .store
            .get_jutsu(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let now = chrono::Utc::now().to_rfc3339();
        let updated = self
            .store
            .set_jutsu_image(id, None, &now)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(old) = &existing.image {
            self.remove_asset(old).await;
        }

        Ok(updated)
    }
}
