pub mod analytics;
pub mod cache;
pub mod chart;
pub mod item;
pub mod portfolio;
pub mod product;
pub mod settings;

pub(crate) mod lenient;
