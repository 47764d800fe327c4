use crate::models::product::PriceBlock;

/// Which regional figure of a price block a product language maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRegion {
    German,
    French,
    Default,
}

impl PriceRegion {
    /// Classify by prefix, ignoring case: "German (1st ed.)" is German.
    pub fn for_language(language: &str) -> Self {
        let lang = language.to_lowercase();
        if lang.starts_with("german") {
            PriceRegion::German
        } else if lang.starts_with("french") {
            PriceRegion::French
        } else {
            PriceRegion::Default
        }
    }
}

/// Pick the market price for a product language.
///
/// | language | precedence |
/// |---|---|
/// | german…  | `lowest_DE`, `lowest` |
/// | french…  | `lowest_FR`, `lowest` |
/// | other    | `lowest`, `lowest_DE`, `lowest_FR` |
///
/// The German and French chains never fall through to the other region.
pub fn price_for_language(block: Option<&PriceBlock>, language: &str) -> Option<f64> {
    let block = block?;
    match PriceRegion::for_language(language) {
        PriceRegion::German => block.lowest_de.or(block.lowest),
        PriceRegion::French => block.lowest_fr.or(block.lowest),
        PriceRegion::Default => block.lowest.or(block.lowest_de).or(block.lowest_fr),
    }
}
