pub mod analytics_service;
pub mod cardmarket;
pub mod catalog_service;
pub mod chart_service;
pub mod cooldown;
pub mod normalizer;
pub mod price_resolver;
pub mod refresh_service;
