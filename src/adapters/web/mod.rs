//! Web adapter: axum router, session/auth layers and request handlers.

mod auth;
mod error;
mod handlers;
mod templates;

pub use auth::{AuthSession, Backend, Credentials, SessionUser, hash_password};
pub use error::WebError;

use std::sync::Arc;

use axum::{Router, routing::get};
use axum_login::{AuthManagerLayerBuilder, login_required};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

pub struct AppState {
    pub store: Arc<dyn StorePort + Send + Sync>,
    pub quotes: Arc<dyn QuotePort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    let lifetime = state.config.get_int("web", "session_lifetime", 86_400);
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(lifetime)))
        .with_signed(session_key(&*state.config));

    let backend = Backend::new(state.store.clone());
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let state = Arc::new(state);

    Router::new()
        .route("/", get(handlers::index))
        .route("/buy", get(handlers::buy_form).post(handlers::buy))
        .route("/sell", get(handlers::sell_form).post(handlers::sell))
        .route("/quote", get(handlers::quote_form).post(handlers::quote))
        .route("/history", get(handlers::history))
        .route_layer(login_required!(Backend, login_url = "/login"))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .fallback(handlers::not_found)
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Signing key for session cookies: `[web] session_secret` (hex, 64+
/// bytes decoded) when configured, otherwise a fresh random key, which
/// invalidates sessions across restarts.
fn session_key(config: &dyn ConfigPort) -> Key {
    config
        .get_string("web", "session_secret")
        .and_then(|secret| hex::decode(secret).ok())
        .and_then(|bytes| Key::try_from(&bytes[..]).ok())
        .unwrap_or_else(Key::generate)
}
