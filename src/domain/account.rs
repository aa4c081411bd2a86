//! Account types and registration validation.

use chrono::NaiveDateTime;

use super::error::FinanceError;

/// A registered user. `cash` is the simulated balance available for buys.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub cash: f64,
}

/// Current position in one symbol. `shares` is always positive; a sell
/// that reaches zero deletes the row instead of storing a zero.
/// `last_price`/`last_total` are display caches refreshed on the
/// portfolio view.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub last_price: f64,
    pub last_total: f64,
}

/// One row of the append-only audit log. Positive `shares` is a buy,
/// negative a sell.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub transacted: NaiveDateTime,
}

/// Validate a registration form before any row is created. The duplicate
/// username case is left to the store's UNIQUE constraint.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), FinanceError> {
    if username.trim().is_empty() {
        return Err(FinanceError::validation("must provide a username"));
    }
    if password.is_empty() {
        return Err(FinanceError::validation("must provide a password"));
    }
    if password != confirmation {
        return Err(FinanceError::validation("passwords do not match"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_registration() {
        assert!(validate_registration("alice", "hunter2", "hunter2").is_ok());
    }

    #[test]
    fn rejects_blank_username() {
        let err = validate_registration("  ", "pw", "pw").unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn rejects_empty_password() {
        let err = validate_registration("alice", "", "").unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn rejects_mismatched_confirmation() {
        let err = validate_registration("alice", "hunter2", "hunter3").unwrap_err();
        assert!(err.to_string().contains("match"));
    }
}
