//! HTML templates using Askama.

use askama::Template;

use crate::domain::account::TradeRecord;
use crate::domain::portfolio::PortfolioRow;
use crate::domain::quote::Quote;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub rows: Vec<PortfolioRow>,
    pub cash: f64,
    pub total: f64,
}

#[derive(Template)]
#[template(path = "buy.html")]
pub struct BuyTemplate;

#[derive(Template)]
#[template(path = "sell.html")]
pub struct SellTemplate {
    pub symbols: Vec<String>,
}

#[derive(Template)]
#[template(path = "quote.html")]
pub struct QuoteFormTemplate;

#[derive(Template)]
#[template(path = "quoted.html")]
pub struct QuotedTemplate {
    pub quote: Quote,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate;

#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub records: Vec<TradeRecord>,
}

#[derive(Template)]
#[template(path = "apology.html")]
pub struct ApologyTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

pub mod filters {
    use crate::domain::money;

    pub fn usd(value: &f64) -> askama::Result<String> {
        Ok(money::usd(*value))
    }
}
