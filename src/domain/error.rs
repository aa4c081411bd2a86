//! Domain error types.

/// Top-level error type for paperstock.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{reason}")]
    Validation { reason: String },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("quote lookup failed for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    #[error("insufficient funds: need ${cost:.2}, have ${available:.2}")]
    InsufficientFunds { cost: f64, available: f64 },

    #[error("insufficient shares of {symbol}: hold {held}, tried to sell {requested}")]
    InsufficientShares {
        symbol: String,
        held: i64,
        requested: i64,
    },

    #[error("username already taken: {username}")]
    DuplicateUsername { username: String },

    #[error("password hashing failed: {reason}")]
    PasswordHash { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FinanceError {
    pub fn validation(reason: impl Into<String>) -> Self {
        FinanceError::Validation {
            reason: reason.into(),
        }
    }
}

impl From<&FinanceError> for std::process::ExitCode {
    fn from(err: &FinanceError) -> Self {
        let code: u8 = match err {
            FinanceError::Io(_) => 1,
            FinanceError::ConfigParse { .. }
            | FinanceError::ConfigMissing { .. }
            | FinanceError::ConfigInvalid { .. } => 2,
            FinanceError::Database { .. } | FinanceError::DatabaseQuery { .. } => 3,
            FinanceError::Validation { .. }
            | FinanceError::DuplicateUsername { .. }
            | FinanceError::PasswordHash { .. } => 4,
            FinanceError::UnknownSymbol { .. }
            | FinanceError::QuoteUnavailable { .. }
            | FinanceError::InsufficientFunds { .. }
            | FinanceError::InsufficientShares { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
