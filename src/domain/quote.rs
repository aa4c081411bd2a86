//! Point-in-time price lookup result.

/// A quote as returned by the provider: company name, normalized symbol
/// and the latest price.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}
