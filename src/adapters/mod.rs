//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod http_quote_adapter;
pub mod sqlite_store;
pub mod web;
