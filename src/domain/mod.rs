//! Business logic: account types, order validation, trade execution and
//! portfolio valuation. Nothing in here touches HTTP or SQL directly;
//! persistence and quotes come in through the port traits.

pub mod account;
pub mod error;
pub mod money;
pub mod portfolio;
pub mod quote;
pub mod trading;
