//! Cardmarket deep links for portfolio items.
//!
//! Links always filter on seller country 7 and, for English and German
//! products, on the product language.

use reqwest::Url;

use crate::models::item::PortfolioItem;

const SEARCH_BASE: &str = "https://www.cardmarket.com/de/Pokemon/Products/Search";
const SELLER_COUNTRY: &str = "7";

pub fn is_valid_http_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Cardmarket's `language` query value for a product language.
pub fn language_param(language: &str) -> Option<&'static str> {
    let lang = language.to_lowercase();
    if lang.starts_with("english") {
        Some("1")
    } else if lang.starts_with("german") {
        Some("3")
    } else {
        None
    }
}

/// Set `key=value` where `key` first appears, dropping later duplicates.
/// Appended at the end when the query has no `key` yet.
fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut found = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (k, v) in url.query_pairs() {
        if k.as_ref() != key {
            pairs.push((k.into_owned(), v.into_owned()));
        } else if !found {
            found = true;
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    if !found {
        pairs.push((key.to_string(), value.to_string()));
    }
    url.query_pairs_mut().clear().extend_pairs(&pairs);
}

fn apply_filters(url: &mut Url, language: &str) {
    set_query_param(url, "sellerCountry", SELLER_COUNTRY);
    if let Some(lang) = language_param(language) {
        set_query_param(url, "language", lang);
    }
}

/// Add the seller-country and language filters to a product URL.
///
/// Returns an empty string for non-http(s) input and the input unchanged
/// if it cannot be parsed.
pub fn build_product_url(base_url: &str, language: &str) -> String {
    if !is_valid_http_url(base_url) {
        return String::new();
    }
    match Url::parse(base_url) {
        Ok(mut url) => {
            apply_filters(&mut url, language);
            url.to_string()
        }
        Err(_) => base_url.to_string(),
    }
}

/// Cardmarket product search for `name`. Empty for an empty name.
pub fn build_search_url(name: &str, language: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let Ok(mut url) = Url::parse(SEARCH_BASE) else {
        return String::new();
    };
    url.query_pairs_mut().append_pair("searchString", name);
    apply_filters(&mut url, language);
    url.to_string()
}

/// The stored product link when it is usable, otherwise a search by name.
pub fn link_for_item(item: &PortfolioItem) -> String {
    let direct = item
        .cardmarket_url
        .as_deref()
        .map(|u| build_product_url(u, &item.language))
        .unwrap_or_default();
    if direct.is_empty() {
        build_search_url(&item.name, &item.language)
    } else {
        direct
    }
}
