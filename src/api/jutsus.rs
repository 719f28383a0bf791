use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, JutsuDto, MessageResponse, PageDto};
use crate::api::validation::{
    clamp_page_size, parse_category, parse_element, parse_filter_category, parse_filter_element,
    parse_filter_rank, parse_ordering, parse_rank, validate_jutsu_id,
};
use crate::models::{Category, Element, JutsuDraft, JutsuFilter, JutsuPatch, Rank};
use crate::services::FieldError;

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub element: Option<String>,
    /// `type` on the wire, matching the original catalog surface.
    #[serde(alias = "type")]
    pub category: Option<String>,
    pub rank: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateJutsuRequest {
    pub name: String,
    pub description: String,
    #[serde(alias = "element_type")]
    pub element: Option<String>,
    #[serde(alias = "jutsu_type")]
    pub category: Option<String>,
    pub rank: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateJutsuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "element_type")]
    pub element: Option<String>,
    #[serde(alias = "jutsu_type")]
    pub category: Option<String>,
    pub rank: Option<String>,
}

#[derive(Deserialize)]
pub struct AttachImageRequest {
    pub url: String,
}

/// GET /jutsus
///
/// Filter axes combine conjunctively; `search` matches name or description
/// case-insensitively. Unfiltered listings come back ordered by name.
pub async fn list_jutsus(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let default_page_size = state.config().read().await.catalog.page_size;

    let filter = JutsuFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        element: parse_filter_element(params.element.as_deref())?,
        category: parse_filter_category(params.category.as_deref())?,
        rank: parse_filter_rank(params.rank.as_deref())?,
        ordering: parse_ordering(params.ordering.as_deref())?,
        page: params.page.unwrap_or(1).max(1),
        page_size: clamp_page_size(params.page_size, default_page_size),
    };

    let page = state.catalog().list(filter).await?;
    Ok(Json(ApiResponse::success(PageDto::from(page))))
}

/// GET /jutsus/{id}
pub async fn get_jutsu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<JutsuDto>>, ApiError> {
    validate_jutsu_id(id)?;
    let jutsu = state.catalog().get(id).await?;
    Ok(Json(ApiResponse::success(JutsuDto::from(jutsu))))
}

fn parse_draft(payload: CreateJutsuRequest) -> Result<JutsuDraft, ApiError> {
    let mut errors: Vec<FieldError> = Vec::new();

    let element = match payload.element.as_deref().filter(|t| !t.is_empty()) {
        Some(tag) => parse_element(tag).unwrap_or_else(|e| {
            errors.push(e);
            Element::default()
        }),
        None => Element::default(),
    };
    let category = match payload.category.as_deref().filter(|t| !t.is_empty()) {
        Some(tag) => parse_category(tag).unwrap_or_else(|e| {
            errors.push(e);
            Category::default()
        }),
        None => Category::default(),
    };
    let rank = match payload.rank.as_deref().filter(|t| !t.is_empty()) {
        Some(tag) => parse_rank(tag).unwrap_or_else(|e| {
            errors.push(e);
            Rank::default()
        }),
        None => Rank::default(),
    };

    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    Ok(JutsuDraft {
        name: payload.name,
        description: payload.description,
        element,
        category,
        rank,
        image_url: payload.image_url.filter(|u| !u.trim().is_empty()),
    })
}

fn parse_patch(payload: UpdateJutsuRequest) -> Result<JutsuPatch, ApiError> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut patch = JutsuPatch {
        name: payload.name,
        description: payload.description,
        ..JutsuPatch::default()
    };

    if let Some(tag) = payload.element.as_deref().filter(|t| !t.is_empty()) {
        match parse_element(tag) {
            Ok(element) => patch.element = Some(element),
            Err(e) => errors.push(e),
        }
    }
    if let Some(tag) = payload.category.as_deref().filter(|t| !t.is_empty()) {
        match parse_category(tag) {
            Ok(category) => patch.category = Some(category),
            Err(e) => errors.push(e),
        }
    }
    if let Some(tag) = payload.rank.as_deref().filter(|t| !t.is_empty()) {
        match parse_rank(tag) {
            Ok(rank) => patch.rank = Some(rank),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    Ok(patch)
}

/// POST /jutsus
pub async fn create_jutsu(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateJutsuRequest>,
) -> Result<Json<ApiResponse<JutsuDto>>, ApiError> {
    let draft = parse_draft(payload)?;
    let jutsu = state.catalog().create(draft).await?;
    Ok(Json(ApiResponse::success(JutsuDto::from(jutsu))))
}

/// PUT/PATCH /jutsus/{id}
pub async fn update_jutsu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateJutsuRequest>,
) -> Result<Json<ApiResponse<JutsuDto>>, ApiError> {
    validate_jutsu_id(id)?;
    let patch = parse_patch(payload)?;
    let jutsu = state.catalog().update(id, patch).await?;
    Ok(Json(ApiResponse::success(JutsuDto::from(jutsu))))
}

/// DELETE /jutsus/{id}
pub async fn delete_jutsu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validate_jutsu_id(id)?;
    state.catalog().delete(id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Jutsu {id} deleted"),
    })))
}

/// POST /jutsus/{id}/image
pub async fn attach_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AttachImageRequest>,
) -> Result<Json<ApiResponse<JutsuDto>>, ApiError> {
    validate_jutsu_id(id)?;
    if payload.url.trim().is_empty() {
        return Err(ApiError::ValidationFailed(vec![FieldError::new(
            "url",
            "Image URL is required",
        )]));
    }

    let jutsu = state.catalog().attach_image(id, payload.url.trim()).await?;
    Ok(Json(ApiResponse::success(JutsuDto::from(jutsu))))
}

/// DELETE /jutsus/{id}/image
pub async fn detach_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<JutsuDto>>, ApiError> {
    validate_jutsu_id(id)?;
    let jutsu = state.catalog().detach_image(id).await?;
    Ok(Json(ApiResponse::success(JutsuDto::from(jutsu))))
}
