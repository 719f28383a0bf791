use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ChoiceDto, ChoicesDto, DashboardDto, HomeDto};
use crate::models::{Category, Element, Rank};

/// GET /dashboard
///
/// Aggregates are recomputed from current store state on every request.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let dashboard = state.stats().dashboard().await?;
    Ok(Json(ApiResponse::success(DashboardDto::from(dashboard))))
}

/// GET /home
pub async fn get_home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HomeDto>>, ApiError> {
    let home = state.stats().home().await?;
    Ok(Json(ApiResponse::success(HomeDto::from(home))))
}

/// GET /choices
pub async fn get_choices() -> Json<ApiResponse<ChoicesDto>> {
    let choices = ChoicesDto {
        elements: Element::ALL
            .into_iter()
            .map(|e| ChoiceDto {
                tag: e.as_tag().to_string(),
                label: e.label(),
            })
            .collect(),
        categories: Category::ALL
            .into_iter()
            .map(|c| ChoiceDto {
                tag: c.as_tag().to_string(),
                label: c.label(),
            })
            .collect(),
        ranks: Rank::ALL
            .into_iter()
            .map(|r| ChoiceDto {
                tag: r.as_tag().to_string(),
                label: r.label(),
            })
            .collect(),
    };

    Json(ApiResponse::success(choices))
}
