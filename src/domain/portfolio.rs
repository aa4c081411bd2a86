//! Portfolio valuation for the index view.

use tracing::warn;

use super::account::Holding;
use super::error::FinanceError;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

/// One display row of the portfolio table.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioRow {
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub total: f64,
    /// True when the quote lookup failed and `price`/`total` are the
    /// cached values from the last successful refresh.
    pub stale: bool,
}

/// The full index view: holdings, cash and grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView {
    pub rows: Vec<PortfolioRow>,
    pub cash: f64,
    pub total: f64,
}

/// Value the user's portfolio at current prices.
///
/// Each holding is refreshed with a live quote and the new
/// price/total persisted. A holding whose lookup fails (unknown
/// symbol or provider outage) is kept in the view with its cached
/// values and flagged stale rather than aborting the whole page.
pub fn value_portfolio(
    store: &dyn StorePort,
    quotes: &dyn QuotePort,
    user_id: i64,
) -> Result<PortfolioView, FinanceError> {
    let holdings = store.holdings_for_user(user_id)?;
    let mut rows = Vec::with_capacity(holdings.len());

    for holding in holdings {
        match quotes.lookup(&holding.symbol) {
            Ok(Some(quote)) => {
                let total = holding.shares as f64 * quote.price;
                store.refresh_holding(user_id, &holding.symbol, quote.price, total)?;
                rows.push(PortfolioRow {
                    symbol: holding.symbol,
                    shares: holding.shares,
                    price: quote.price,
                    total,
                    stale: false,
                });
            }
            Ok(None) => {
                warn!(symbol = %holding.symbol, "symbol no longer quoted, showing cached price");
                rows.push(stale_row(holding));
            }
            Err(err) => {
                warn!(symbol = %holding.symbol, error = %err, "quote lookup failed, showing cached price");
                rows.push(stale_row(holding));
            }
        }
    }

    let cash = store.cash_balance(user_id)?;
    let total = cash + rows.iter().map(|r| r.total).sum::<f64>();

    Ok(PortfolioView { rows, cash, total })
}

fn stale_row(holding: Holding) -> PortfolioRow {
    PortfolioRow {
        symbol: holding.symbol,
        shares: holding.shares,
        price: holding.last_price,
        total: holding.last_total,
        stale: true,
    }
}
