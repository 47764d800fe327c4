use serde::{Deserialize, Serialize};

use super::lenient::de_opt_timestamp;

/// Display currency. Values are shown as-is, no conversion is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Chf,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Eur, Currency::Usd, Currency::Gbp, Currency::Chf];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
        }
    }

    /// Prefix used when formatting money. CHF carries a trailing space.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Chf => "CHF ",
        }
    }

    /// Parse a currency code (case-insensitive). Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Format an amount with this currency's prefix and two decimals.
    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        format!("{}{:.2}", self.symbol(), value)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::parse(&code).unwrap_or_default()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

/// Colour theme of the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

impl From<Theme> for String {
    fn from(t: Theme) -> Self {
        t.as_str().to_string()
    }
}

/// Column the portfolio table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    Name,
    PurchaseDate,
    Quantity,
    PricePaid,
    MarketPrice,
    /// quantity × price paid
    Invested,
    /// quantity × market price
    MarketTotal,
    /// quantity × (market − paid)
    ProfitLoss,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PurchaseDate => "purchaseDate",
            SortKey::Quantity => "quantity",
            SortKey::PricePaid => "pricePaid",
            SortKey::MarketPrice => "marketPrice",
            SortKey::Invested => "invested",
            SortKey::MarketTotal => "marketTotal",
            SortKey::ProfitLoss => "pl",
        }
    }

    /// String keys compare as text, the rest numerically.
    pub fn is_textual(&self) -> bool {
        matches!(self, SortKey::Name | SortKey::PurchaseDate)
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        match s.as_str() {
            "purchaseDate" => SortKey::PurchaseDate,
            "quantity" => SortKey::Quantity,
            "pricePaid" => SortKey::PricePaid,
            "marketPrice" => SortKey::MarketPrice,
            "invested" => SortKey::Invested,
            "marketTotal" => SortKey::MarketTotal,
            "pl" => SortKey::ProfitLoss,
            _ => SortKey::Name,
        }
    }
}

impl From<SortKey> for String {
    fn from(k: SortKey) -> Self {
        k.as_str().to_string()
    }
}

/// Sort direction. Only `"desc"` (any case) means descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<String> for SortDirection {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<SortDirection> for String {
    fn from(d: SortDirection) -> Self {
        match d {
            SortDirection::Asc => "asc".to_string(),
            SortDirection::Desc => "desc".to_string(),
        }
    }
}

/// Process-wide display and session state. Persisted as its own store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub currency: Currency,

    pub theme: Theme,

    pub sort_by: SortKey,

    pub sort_dir: SortDirection,

    /// Milliseconds since the Unix epoch of the last completed bulk refresh.
    #[serde(deserialize_with = "de_opt_timestamp")]
    pub last_refresh_at: Option<i64>,
}
