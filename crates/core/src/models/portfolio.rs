use serde::{Deserialize, Serialize};

use super::cache::ProductCache;
use super::item::PortfolioItem;
use super::settings::Settings;

/// In-memory state of the tracker.
///
/// The three parts are persisted as independent stores (see
/// `storage::manager`); this struct only groups them so services can be
/// handed one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Ordered list of lots. The single source of truth for contents.
    pub items: Vec<PortfolioItem>,

    pub settings: Settings,

    /// Fetched catalog details, keyed by catalog id.
    pub cache: ProductCache,
}

impl Portfolio {
    pub fn find_item(&self, id: &str) -> Option<&PortfolioItem> {
        self.items.iter().find(|it| it.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|it| it.id == id)
    }
}
