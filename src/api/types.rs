use serde::Serialize;

use crate::models::{Category, Element, Jutsu, Page, Rank};
use crate::services::FieldError;
use crate::services::stats_service::{Dashboard, HomeHighlights};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-field detail for validation and conflict errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            fields: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            fields: None,
        }
    }

    pub fn error_with_fields(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            fields: Some(fields),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JutsuDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub element: Element,
    pub element_display: &'static str,
    pub category: Category,
    pub category_display: &'static str,
    pub rank: Rank,
    pub rank_display: &'static str,
    /// Serving path of the stored image asset, if any.
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Jutsu> for JutsuDto {
    fn from(jutsu: Jutsu) -> Self {
        Self {
            id: jutsu.id,
            name: jutsu.name,
            description: jutsu.description,
            element: jutsu.element,
            element_display: jutsu.element.label(),
            category: jutsu.category,
            category_display: jutsu.category.label(),
            rank: jutsu.rank,
            rank_display: jutsu.rank.label(),
            image: jutsu.image.map(|f| format!("/images/{f}")),
            created_at: jutsu.created_at,
            updated_at: jutsu.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageDto {
    pub items: Vec<JutsuDto>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self {
            items: page.items.into_iter().map(JutsuDto::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagCountDto {
    pub tag: String,
    pub label: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub total: u64,
    pub distinct_elements: u64,
    pub elements: Vec<TagCountDto>,
    pub categories: Vec<TagCountDto>,
    pub ranks: Vec<TagCountDto>,
    pub recent: Vec<JutsuDto>,
}

impl From<Dashboard> for DashboardDto {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            total: dashboard.total,
            distinct_elements: dashboard.distinct_elements,
            elements: dashboard
                .elements
                .into_iter()
                .map(|(element, count)| TagCountDto {
                    tag: element.as_tag().to_string(),
                    label: element.label(),
                    count,
                })
                .collect(),
            categories: dashboard
                .categories
                .into_iter()
                .map(|(category, count)| TagCountDto {
                    tag: category.as_tag().to_string(),
                    label: category.label(),
                    count,
                })
                .collect(),
            ranks: dashboard
                .ranks
                .into_iter()
                .map(|(rank, count)| TagCountDto {
                    tag: rank.as_tag().to_string(),
                    label: rank.label(),
                    count,
                })
                .collect(),
            recent: dashboard.recent.into_iter().map(JutsuDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomeDto {
    pub latest: Vec<JutsuDto>,
    pub fire_picks: Vec<JutsuDto>,
    pub water_picks: Vec<JutsuDto>,
    pub high_rank_picks: Vec<JutsuDto>,
    pub total: u64,
}

impl From<HomeHighlights> for HomeDto {
    fn from(home: HomeHighlights) -> Self {
        Self {
            latest: home.latest.into_iter().map(JutsuDto::from).collect(),
            fire_picks: home.fire_picks.into_iter().map(JutsuDto::from).collect(),
            water_picks: home.water_picks.into_iter().map(JutsuDto::from).collect(),
            high_rank_picks: home
                .high_rank_picks
                .into_iter()
                .map(JutsuDto::from)
                .collect(),
            total: home.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Choice metadata handed to the UI so selects never hard-code tags.
#[derive(Debug, Serialize)]
pub struct ChoiceDto {
    pub tag: String,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChoicesDto {
    pub elements: Vec<ChoiceDto>,
    pub categories: Vec<ChoiceDto>,
    pub ranks: Vec<ChoiceDto>,
}
