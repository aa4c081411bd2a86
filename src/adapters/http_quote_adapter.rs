//! HTTP quote provider adapter.
//!
//! Speaks the IEX-style quote endpoint: `GET {base_url}/stock/{SYMBOL}/quote`
//! returning `{"symbol", "companyName", "latestPrice"}`. A 404 means the
//! symbol is unknown. The client carries a hard request timeout so a hung
//! provider bounds the request instead of blocking it forever.
//!
//! The blocking reqwest client is used deliberately: the web handlers run
//! all quote/store work on the blocking thread pool.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::error::FinanceError;
use crate::domain::quote::Quote;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    symbol: String,
    #[serde(rename = "companyName")]
    company_name: String,
    #[serde(rename = "latestPrice")]
    latest_price: f64,
}

pub struct HttpQuoteAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpQuoteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FinanceError> {
        let base_url =
            config
                .get_string("quote", "base_url")
                .ok_or_else(|| FinanceError::ConfigMissing {
                    section: "quote".into(),
                    key: "base_url".into(),
                })?;

        let timeout_secs = config.get_int("quote", "timeout_secs", 5);
        if timeout_secs < 1 {
            return Err(FinanceError::ConfigInvalid {
                section: "quote".into(),
                key: "timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        Self::new(base_url, Duration::from_secs(timeout_secs as u64))
    }

    pub fn new(base_url: String, timeout: Duration) -> Result<Self, FinanceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FinanceError::QuoteUnavailable {
                symbol: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn quote_url(&self, symbol: &str) -> String {
        format!("{}/stock/{}/quote", self.base_url, symbol)
    }
}

impl QuotePort for HttpQuoteAdapter {
    fn lookup(&self, symbol: &str) -> Result<Option<Quote>, FinanceError> {
        let unavailable = |reason: String| FinanceError::QuoteUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(self.quote_url(symbol))
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body: QuoteResponse = response.json().map_err(|e| unavailable(e.to_string()))?;

        Ok(Some(Quote {
            symbol: body.symbol.to_uppercase(),
            name: body.company_name,
            price: body.latest_price,
        }))
    }
}
