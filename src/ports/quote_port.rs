//! Quote provider port trait.

use crate::domain::error::FinanceError;
use crate::domain::quote::Quote;

/// Price lookup for one ticker symbol.
///
/// `Ok(None)` means the provider does not know the symbol; `Err` means
/// the provider itself failed (network, timeout, malformed response).
/// Callers that can degrade gracefully treat the two differently.
pub trait QuotePort {
    fn lookup(&self, symbol: &str) -> Result<Option<Quote>, FinanceError>;
}
