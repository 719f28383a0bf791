//! Domain service for catalog records: creation, lookup, mutation, deletion,
//! and filtered listing.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Jutsu, JutsuDraft, JutsuFilter, JutsuPatch, Page};

/// Upper bound on `name` length, matching the column definition.
pub const NAME_MAX_LEN: usize = 100;

/// A single field-level validation failure, surfaced to callers as part of
/// a structured error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Jutsu {0} not found")]
    NotFound(i32),

    #[error("A jutsu named '{0}' already exists")]
    DuplicateName(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Failed to fetch image: {0}")]
    ImageFetch(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for the catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a record, fetching the image asset first when a source URL
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] when the name is taken and
    /// [`CatalogError::Validation`] on bad field values.
    async fn create(&self, draft: JutsuDraft) -> Result<Jutsu, CatalogError>;

    async fn get(&self, id: i32) -> Result<Jutsu, CatalogError>;

    /// Applies a partial update; `updated_at` is refreshed, `created_at`
    /// and `id` never change.
    async fn update(&self, id: i32, patch: JutsuPatch) -> Result<Jutsu, CatalogError>;

    /// Deletes a record permanently, removing its stored image asset so no
    /// orphaned files remain.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;

    /// Filtered, ordered, paginated listing. An out-of-range page yields an
    /// empty page.
    async fn list(&self, filter: JutsuFilter) -> Result<Page, CatalogError>;

    /// Fetches the asset at `url` and attaches it, replacing (and removing)
    /// any previous asset.
    async fn attach_image(&self, id: i32, url: &str) -> Result<Jutsu, CatalogError>;

    /// Detaches and removes the stored asset, if any.
    async fn detach_image(&self, id: i32) -> Result<Jutsu, CatalogError>;
}

/// Field checks shared by create and update paths.
#[must_use]
pub fn validate_name(name: &str) -> Option<FieldError> {
    if name.is_empty() {
        return Some(FieldError::new("name", "Name is required"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Some(FieldError::new(
            "name",
            format!("Name must be {NAME_MAX_LEN} characters or less"),
        ));
    }
    None
}

#[must_use]
pub fn validate_description(description: &str) -> Option<FieldError> {
    if description.trim().is_empty() {
        return Some(FieldError::new("description", "Description is required"));
    }
    None
}
