use super::ApiError;
use crate::models::{Category, Element, MAX_PAGE_SIZE, Ordering, Rank};
use crate::services::FieldError;

pub fn validate_jutsu_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid jutsu ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

/// Parses a closed-set tag from a request body, reporting the offending
/// field on failure.
pub fn parse_element(tag: &str) -> Result<Element, FieldError> {
    Element::from_tag(tag).ok_or_else(|| {
        FieldError::new("element", format!("'{tag}' is not a recognized element"))
    })
}

pub fn parse_category(tag: &str) -> Result<Category, FieldError> {
    Category::from_tag(tag).ok_or_else(|| {
        FieldError::new("category", format!("'{tag}' is not a recognized category"))
    })
}

pub fn parse_rank(tag: &str) -> Result<Rank, FieldError> {
    Rank::from_tag(tag)
        .ok_or_else(|| FieldError::new("rank", format!("'{tag}' is not a recognized rank")))
}

/// Parses an optional filter tag from a query string; a bad tag is a plain
/// 400 since there is no request body to attribute fields to.
pub fn parse_filter_element(tag: Option<&str>) -> Result<Option<Element>, ApiError> {
    tag.filter(|t| !t.is_empty())
        .map(|t| {
            Element::from_tag(t)
                .ok_or_else(|| ApiError::validation(format!("Unknown element filter: {t}")))
        })
        .transpose()
}

pub fn parse_filter_category(tag: Option<&str>) -> Result<Option<Category>, ApiError> {
    tag.filter(|t| !t.is_empty())
        .map(|t| {
            Category::from_tag(t)
                .ok_or_else(|| ApiError::validation(format!("Unknown category filter: {t}")))
        })
        .transpose()
}

pub fn parse_filter_rank(tag: Option<&str>) -> Result<Option<Rank>, ApiError> {
    tag.filter(|t| !t.is_empty())
        .map(|t| {
            Rank::from_tag(t).ok_or_else(|| ApiError::validation(format!("Unknown rank filter: {t}")))
        })
        .transpose()
}

pub fn parse_ordering(param: Option<&str>) -> Result<Ordering, ApiError> {
    match param.filter(|p| !p.is_empty()) {
        None => Ok(Ordering::default()),
        Some(p) => Ordering::from_param(p)
            .ok_or_else(|| ApiError::validation(format!("Unknown ordering: {p}"))),
    }
}

/// Clamps a requested page size into the allowed window.
#[must_use]
pub fn clamp_page_size(requested: Option<u64>, default: u64) -> u64 {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}
