//! SQLite persistence adapter.

use chrono::NaiveDateTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

use crate::domain::account::{Holding, TradeRecord, User};
use crate::domain::error::FinanceError;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn pool_err(e: r2d2::Error) -> FinanceError {
    FinanceError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> FinanceError {
    FinanceError::DatabaseQuery {
        reason: e.to_string(),
    }
}

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FinanceError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| FinanceError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory store, used by tests.
    pub fn in_memory() -> Result<Self, FinanceError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                cash REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS holdings (
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL CHECK (shares > 0),
                last_price REAL NOT NULL DEFAULT 0,
                last_total REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, symbol)
            );
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL,
                price REAL NOT NULL,
                transacted TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id, id);",
        )
        .map_err(query_err)?;

        Ok(())
    }

    fn now_string() -> String {
        chrono::Utc::now()
            .naive_utc()
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        cash: row.get(3)?,
    })
}

fn row_to_holding(row: &rusqlite::Row<'_>) -> rusqlite::Result<Holding> {
    Ok(Holding {
        user_id: row.get(0)?,
        symbol: row.get(1)?,
        shares: row.get(2)?,
        last_price: row.get(3)?,
        last_total: row.get(4)?,
    })
}

impl StorePort for SqliteStore {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<User, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let result = conn.execute(
            "INSERT INTO users (username, password_hash, cash) VALUES (?1, ?2, ?3)",
            params![username, password_hash, starting_cash],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                cash: starting_cash,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(FinanceError::DuplicateUsername {
                    username: username.to_string(),
                })
            }
            Err(e) => Err(query_err(e)),
        }
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<User>, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.query_row(
            "SELECT id, username, password_hash, cash FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        )
        .optional()
        .map_err(query_err)
    }

    fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.query_row(
            "SELECT id, username, password_hash, cash FROM users WHERE id = ?1",
            params![user_id],
            row_to_user,
        )
        .optional()
        .map_err(query_err)
    }

    fn cash_balance(&self, user_id: i64) -> Result<f64, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.query_row(
            "SELECT cash FROM users WHERE id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(query_err)
    }

    fn holdings_for_user(&self, user_id: i64) -> Result<Vec<Holding>, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT user_id, symbol, shares, last_price, last_total
                 FROM holdings WHERE user_id = ?1 ORDER BY symbol",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], row_to_holding)
            .map_err(query_err)?;

        let mut holdings = Vec::new();
        for row in rows {
            holdings.push(row.map_err(query_err)?);
        }

        Ok(holdings)
    }

    fn holding(&self, user_id: i64, symbol: &str) -> Result<Option<Holding>, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.query_row(
            "SELECT user_id, symbol, shares, last_price, last_total
             FROM holdings WHERE user_id = ?1 AND symbol = ?2",
            params![user_id, symbol],
            row_to_holding,
        )
        .optional()
        .map_err(query_err)
    }

    fn refresh_holding(
        &self,
        user_id: i64,
        symbol: &str,
        price: f64,
        total: f64,
    ) -> Result<(), FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute(
            "UPDATE holdings SET last_price = ?3, last_total = ?4
             WHERE user_id = ?1 AND symbol = ?2",
            params![user_id, symbol, price, total],
        )
        .map_err(query_err)?;

        Ok(())
    }

    fn apply_buy(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), FinanceError> {
        let mut conn = self.pool.get().map_err(pool_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        let cost = shares as f64 * price;

        // Guarded debit: zero rows updated means the balance would go
        // negative, in which case the whole transaction is abandoned.
        let updated = tx
            .execute(
                "UPDATE users SET cash = cash - ?2 WHERE id = ?1 AND cash >= ?2",
                params![user_id, cost],
            )
            .map_err(query_err)?;

        if updated == 0 {
            let available: f64 = tx
                .query_row(
                    "SELECT cash FROM users WHERE id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .map_err(query_err)?;
            return Err(FinanceError::InsufficientFunds { cost, available });
        }

        tx.execute(
            "INSERT INTO transactions (user_id, symbol, shares, price, transacted)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, symbol, shares, price, Self::now_string()],
        )
        .map_err(query_err)?;

        tx.execute(
            "INSERT INTO holdings (user_id, symbol, shares, last_price, last_total)
             VALUES (?1, ?2, ?3, ?4, ?3 * ?4)
             ON CONFLICT(user_id, symbol) DO UPDATE SET
                 shares = shares + excluded.shares,
                 last_price = excluded.last_price,
                 last_total = (shares + excluded.shares) * excluded.last_price",
            params![user_id, symbol, shares, price],
        )
        .map_err(query_err)?;

        tx.commit().map_err(query_err)
    }

    fn apply_sell(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: f64,
    ) -> Result<(), FinanceError> {
        let mut conn = self.pool.get().map_err(pool_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        let held: i64 = tx
            .query_row(
                "SELECT shares FROM holdings WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, symbol],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_err)?
            .unwrap_or(0);

        if held < shares {
            return Err(FinanceError::InsufficientShares {
                symbol: symbol.to_string(),
                held,
                requested: shares,
            });
        }

        tx.execute(
            "INSERT INTO transactions (user_id, symbol, shares, price, transacted)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, symbol, -shares, price, Self::now_string()],
        )
        .map_err(query_err)?;

        tx.execute(
            "UPDATE users SET cash = cash + ?2 WHERE id = ?1",
            params![user_id, shares as f64 * price],
        )
        .map_err(query_err)?;

        if held == shares {
            tx.execute(
                "DELETE FROM holdings WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, symbol],
            )
            .map_err(query_err)?;
        } else {
            tx.execute(
                "UPDATE holdings SET shares = shares - ?3,
                     last_price = ?4,
                     last_total = (shares - ?3) * ?4
                 WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, symbol, shares, price],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)
    }

    fn transactions_for_user(&self, user_id: i64) -> Result<Vec<TradeRecord>, FinanceError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, symbol, shares, price, transacted
                 FROM transactions WHERE user_id = ?1 ORDER BY id ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let transacted_str: String = row.get(5)?;
                let transacted = NaiveDateTime::parse_from_str(&transacted_str, TIMESTAMP_FORMAT)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            transacted_str.len(),
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(TradeRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    symbol: row.get(2)?,
                    shares: row.get(3)?,
                    price: row.get(4)?,
                    transacted,
                })
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_err)?);
        }

        Ok(records)
    }
}
