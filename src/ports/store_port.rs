//! Persistence port trait.

use crate::domain::account::{Holding, TradeRecord, User};
use crate::domain::error::FinanceError;

/// Durable storage for users, holdings and the transaction log.
///
/// `apply_buy` and `apply_sell` are the only multi-write operations;
/// implementations must execute each as a single atomic transaction so
/// the audit row, the cash update and the holding update never commit
/// partially.
pub trait StorePort {
    /// Insert a new user. Fails with `DuplicateUsername` if the
    /// username is taken; no row is created in that case.
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<User, FinanceError>;

    fn find_user_by_name(&self, username: &str) -> Result<Option<User>, FinanceError>;

    fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, FinanceError>;

    fn cash_balance(&self, user_id: i64) -> Result<f64, FinanceError>;

    fn holdings_for_user(&self, user_id: i64) -> Result<Vec<Holding>, FinanceError>;

    fn holding(&self, user_id: i64, symbol: &str) -> Result<Option<Holding>, FinanceError>;

    /// Overwrite the cached display price/total for one holding.
    fn refresh_holding(
        &self,
        user_id: i64,
        symbol: &str,
        price: f64,
        total: f64,
    ) -> Result<(), FinanceError>;

    /// Atomically: append a positive-share transaction row, debit cash
    /// by `shares * price`, and create or increment the holding. Fails
    /// with `InsufficientFunds` (and writes nothing) if cash would go
    /// negative.
    fn apply_buy(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), FinanceError>;

    /// Atomically: append a negative-share transaction row, credit cash
    /// by `shares * price`, and decrement the holding, deleting it when
    /// it reaches zero. Fails with `InsufficientShares` (and writes
    /// nothing) if the position is too small.
    fn apply_sell(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), FinanceError>;

    /// The full audit log for a user, oldest first.
    fn transactions_for_user(&self, user_id: i64) -> Result<Vec<TradeRecord>, FinanceError>;
}
