//! Order validation and trade execution.
//!
//! `buy` and `sell` are the only operations that mutate a user's cash
//! and holdings. Each delegates the actual writes to a single store
//! call (`apply_buy`/`apply_sell`) so the transaction row, the cash
//! update and the holding update commit or roll back as one unit.

use super::error::FinanceError;
use super::quote::Quote;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

/// Outcome of a completed buy or sell, for logging and display.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeConfirmation {
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    /// Total cost of a buy, or proceeds of a sell.
    pub amount: f64,
}

/// Uppercase and validate a user-supplied symbol.
pub fn normalize_symbol(raw: &str) -> Result<String, FinanceError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(FinanceError::validation("must provide a stock symbol"));
    }
    Ok(symbol)
}

/// Parse a share count from form input. Zero is rejected explicitly as
/// an invalid quantity, not treated as a missing field.
pub fn parse_shares(raw: &str) -> Result<i64, FinanceError> {
    let shares: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FinanceError::validation("shares must be a positive integer"))?;
    if shares < 1 {
        return Err(FinanceError::validation("shares must be a positive integer"));
    }
    Ok(shares)
}

fn resolve_quote(quotes: &dyn QuotePort, symbol: &str) -> Result<Quote, FinanceError> {
    quotes
        .lookup(symbol)?
        .ok_or_else(|| FinanceError::UnknownSymbol {
            symbol: symbol.to_string(),
        })
}

/// Buy `shares` of `symbol` at the current quoted price.
///
/// Rejects unknown symbols and orders costing more than the user's
/// cash. The cash guard is re-checked inside the store transaction, so
/// the pre-check here only exists to produce a friendly error without
/// opening a write transaction.
pub fn buy(
    store: &dyn StorePort,
    quotes: &dyn QuotePort,
    user_id: i64,
    symbol: &str,
    shares: i64,
) -> Result<TradeConfirmation, FinanceError> {
    let symbol = normalize_symbol(symbol)?;
    if shares < 1 {
        return Err(FinanceError::validation("shares must be a positive integer"));
    }

    let quote = resolve_quote(quotes, &symbol)?;
    let cost = shares as f64 * quote.price;

    let available = store.cash_balance(user_id)?;
    if cost > available {
        return Err(FinanceError::InsufficientFunds { cost, available });
    }

    store.apply_buy(user_id, &quote.symbol, shares, quote.price)?;

    Ok(TradeConfirmation {
        symbol: quote.symbol,
        shares,
        price: quote.price,
        amount: cost,
    })
}

/// Sell `shares` of `symbol` at the current quoted price.
///
/// Rejects sells of symbols the user does not hold and sells larger
/// than the held position. Reaching zero shares deletes the holding
/// row inside the same store transaction.
pub fn sell(
    store: &dyn StorePort,
    quotes: &dyn QuotePort,
    user_id: i64,
    symbol: &str,
    shares: i64,
) -> Result<TradeConfirmation, FinanceError> {
    let symbol = normalize_symbol(symbol)?;
    if shares < 1 {
        return Err(FinanceError::validation("shares must be a positive integer"));
    }

    let held = store
        .holding(user_id, &symbol)?
        .map(|h| h.shares)
        .unwrap_or(0);
    if held < shares {
        return Err(FinanceError::InsufficientShares {
            symbol,
            held,
            requested: shares,
        });
    }

    let quote = resolve_quote(quotes, &symbol)?;
    let proceeds = shares as f64 * quote.price;

    store.apply_sell(user_id, &quote.symbol, shares, quote.price)?;

    Ok(TradeConfirmation {
        symbol: quote.symbol,
        shares,
        price: quote.price,
        amount: proceeds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_symbol_uppercases_and_trims() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
    }

    #[test]
    fn normalize_symbol_rejects_empty() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
    }

    #[test]
    fn parse_shares_accepts_positive_integers() {
        assert_eq!(parse_shares("10").unwrap(), 10);
        assert_eq!(parse_shares(" 1 ").unwrap(), 1);
    }

    #[test]
    fn parse_shares_rejects_zero() {
        let err = parse_shares("0").unwrap_err();
        assert_eq!(err.to_string(), "shares must be a positive integer");
    }

    #[test]
    fn parse_shares_rejects_negative_and_garbage() {
        assert!(parse_shares("-5").is_err());
        assert!(parse_shares("ten").is_err());
        assert!(parse_shares("2.5").is_err());
        assert!(parse_shares("").is_err());
    }
}
