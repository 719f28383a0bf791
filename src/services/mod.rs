pub mod image;
pub use image::ImageService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, FieldError};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod stats_service;
pub mod stats_service_impl;
pub use stats_service::{Dashboard, HomeHighlights, StatsError, StatsService};
pub use stats_service_impl::SeaOrmStatsService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;
