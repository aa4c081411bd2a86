#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use paperstock::adapters::sqlite_store::SqliteStore;
use paperstock::adapters::web::{AppState, build_router};
use paperstock::domain::error::FinanceError;
use paperstock::domain::quote::Quote;
use paperstock::ports::config_port::ConfigPort;
use paperstock::ports::quote_port::QuotePort;

/// Quote provider with scripted prices and failures. Prices can be
/// changed mid-test to simulate market movement between a buy and a
/// sell.
pub struct ScriptedQuotes {
    prices: Mutex<HashMap<String, (String, f64)>>,
    failures: Mutex<HashMap<String, String>>,
}

impl ScriptedQuotes {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_price(self, symbol: &str, name: &str, price: f64) -> Self {
        self.set_price(symbol, name, price);
        self
    }

    pub fn with_failure(self, symbol: &str, reason: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn set_failure(&self, symbol: &str, reason: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reason.to_string());
    }

    pub fn set_price(&self, symbol: &str, name: &str, price: f64) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), (name.to_string(), price));
    }
}

impl QuotePort for ScriptedQuotes {
    fn lookup(&self, symbol: &str) -> Result<Option<Quote>, FinanceError> {
        if let Some(reason) = self.failures.lock().unwrap().get(symbol) {
            return Err(FinanceError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .prices
            .lock()
            .unwrap()
            .get(symbol)
            .map(|(name, price)| Quote {
                symbol: symbol.to_string(),
                name: name.clone(),
                price: *price,
            }))
    }
}

pub struct TestConfig;

impl ConfigPort for TestConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            // 64 bytes of signing key material, hex encoded
            ("web", "session_secret") => Some("ab".repeat(64)),
            _ => None,
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match (section, key) {
            ("web", "session_lifetime") => 86_400,
            _ => default,
        }
    }

    fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
        default
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

pub fn fresh_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store.initialize_schema().unwrap();
    store
}

pub fn test_app_with(quotes: Arc<ScriptedQuotes>) -> Router {
    let state = AppState {
        store: Arc::new(fresh_store()),
        quotes,
        config: Arc::new(TestConfig),
    };
    build_router(state)
}

pub fn test_app(quotes: ScriptedQuotes) -> Router {
    test_app_with(Arc::new(quotes))
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn extract_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

pub fn build_cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .map(|sc| sc.split(';').next().unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Register a user (which also logs them in) and return the session
/// cookie header for subsequent requests.
pub async fn register(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}&confirmation={password}");
    let response = app
        .clone()
        .oneshot(form_request("/register", &body, None))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "registration should redirect"
    );
    build_cookie_header(&extract_cookies(&response))
}
