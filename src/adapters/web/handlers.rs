//! HTTP request handlers.
//!
//! Store and quote-provider calls are synchronous, so every handler that
//! touches them runs the whole business operation on the blocking thread
//! pool via [`run_blocking`].

use std::sync::Arc;

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokio::task;
use tracing::info;

use crate::domain::error::FinanceError;
use crate::domain::{account, portfolio, trading};

use super::AppState;
use super::auth::{AuthSession, Credentials, SessionUser, hash_password};
use super::error::WebError;
use super::templates::{
    BuyTemplate, HistoryTemplate, IndexTemplate, LoginTemplate, QuoteFormTemplate, QuotedTemplate,
    RegisterTemplate, SellTemplate,
};

fn render<T: Template>(template: &T) -> Result<Response, WebError> {
    template
        .render()
        .map(|html| Html(html).into_response())
        .map_err(|e| WebError::internal(e.to_string()))
}

async fn run_blocking<T, F>(f: F) -> Result<T, WebError>
where
    F: FnOnce() -> Result<T, FinanceError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| WebError::internal(e.to_string()))?
        .map_err(WebError::from)
}

fn current_user_id(auth: &AuthSession) -> Result<i64, WebError> {
    auth.user
        .as_ref()
        .map(|user| user.0.id)
        .ok_or_else(|| WebError::forbidden("not logged in"))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> Result<Response, WebError> {
    let user_id = current_user_id(&auth)?;
    let store = state.store.clone();
    let quotes = state.quotes.clone();

    let view = run_blocking(move || portfolio::value_portfolio(&*store, &*quotes, user_id)).await?;

    render(&IndexTemplate {
        rows: view.rows,
        cash: view.cash,
        total: view.total,
    })
}

#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub symbol: String,
    pub shares: String,
}

pub async fn buy_form() -> Result<Response, WebError> {
    render(&BuyTemplate)
}

pub async fn buy(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<OrderForm>,
) -> Result<Response, WebError> {
    let user_id = current_user_id(&auth)?;
    let shares = trading::parse_shares(&form.shares)?;
    let store = state.store.clone();
    let quotes = state.quotes.clone();

    let confirmation =
        run_blocking(move || trading::buy(&*store, &*quotes, user_id, &form.symbol, shares))
            .await?;

    info!(
        user_id,
        symbol = %confirmation.symbol,
        shares = confirmation.shares,
        price = confirmation.price,
        "buy executed"
    );
    Ok(Redirect::to("/").into_response())
}

pub async fn sell_form(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> Result<Response, WebError> {
    let user_id = current_user_id(&auth)?;
    let store = state.store.clone();

    let symbols = run_blocking(move || {
        Ok(store
            .holdings_for_user(user_id)?
            .into_iter()
            .map(|h| h.symbol)
            .collect())
    })
    .await?;

    render(&SellTemplate { symbols })
}

pub async fn sell(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<OrderForm>,
) -> Result<Response, WebError> {
    let user_id = current_user_id(&auth)?;
    let shares = trading::parse_shares(&form.shares)?;
    let store = state.store.clone();
    let quotes = state.quotes.clone();

    let confirmation =
        run_blocking(move || trading::sell(&*store, &*quotes, user_id, &form.symbol, shares))
            .await?;

    info!(
        user_id,
        symbol = %confirmation.symbol,
        shares = confirmation.shares,
        price = confirmation.price,
        "sell executed"
    );
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub symbol: String,
}

pub async fn quote_form() -> Result<Response, WebError> {
    render(&QuoteFormTemplate)
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QuoteForm>,
) -> Result<Response, WebError> {
    let symbol = trading::normalize_symbol(&form.symbol)?;
    let quotes = state.quotes.clone();

    let quote = run_blocking(move || {
        quotes
            .lookup(&symbol)?
            .ok_or_else(|| FinanceError::validation(format!("invalid symbol: {symbol}")))
    })
    .await?;

    render(&QuotedTemplate { quote })
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> Result<Response, WebError> {
    let user_id = current_user_id(&auth)?;
    let store = state.store.clone();

    let records = run_blocking(move || store.transactions_for_user(user_id)).await?;

    render(&HistoryTemplate { records })
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_form() -> Result<Response, WebError> {
    render(&LoginTemplate { error: None })
}

pub async fn login(
    mut auth: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if form.username.trim().is_empty() {
        return Err(WebError::forbidden("must provide a username"));
    }
    if form.password.is_empty() {
        return Err(WebError::forbidden("must provide a password"));
    }

    let creds = Credentials {
        username: form.username,
        password: form.password,
    };
    let user = auth
        .authenticate(creds)
        .await
        .map_err(|e| WebError::internal(e.to_string()))?;

    let Some(user) = user else {
        return render(&LoginTemplate {
            error: Some("Invalid username or password".into()),
        });
    };

    auth.login(&user)
        .await
        .map_err(|e| WebError::internal(e.to_string()))?;

    info!(user_id = user.0.id, "login");
    Ok(Redirect::to("/").into_response())
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirmation: String,
}

pub async fn register_form() -> Result<Response, WebError> {
    render(&RegisterTemplate)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    mut auth: AuthSession,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    account::validate_registration(&form.username, &form.password, &form.confirmation)?;

    let starting_cash = state.config.get_double("app", "starting_cash", 10_000.0);
    let store = state.store.clone();
    let username = form.username.trim().to_string();
    let password = form.password;

    let user = run_blocking(move || {
        let hash = hash_password(&password)?;
        store.create_user(&username, &hash, starting_cash)
    })
    .await?;

    info!(user_id = user.id, username = %user.username, "user registered");

    auth.login(&SessionUser(user))
        .await
        .map_err(|e| WebError::internal(e.to_string()))?;

    Ok(Redirect::to("/").into_response())
}

pub async fn logout(mut auth: AuthSession) -> Result<Response, WebError> {
    auth.logout()
        .await
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn not_found() -> Response {
    WebError::not_found("page not found").into_response()
}
