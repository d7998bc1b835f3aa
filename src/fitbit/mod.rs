//! # Fitbit Integration Module
//!
//! Client for the Fitbit Web API using the OAuth 2.0 implicit grant.
//!
//! ## Flow
//!
//! 1. [`FitbitApi::login`] builds the authorize URL and hands it to a
//!    [`BrowserPresenter`].
//! 2. The user grants access; Fitbit redirects to the callback URL with
//!    `#access_token=...&user_id=...` in the fragment.
//! 3. [`FitbitApi::handle_redirect`] stores both values, rebuilds the
//!    [`Session`] and emits [`AuthEvent::LoggedIn`].
//! 4. API calls go through the session with a bearer header.
//!
//! On startup, call [`FitbitApi::restore_session`] to reuse stored
//! credentials without logging in again.
//!
//! ## Architecture
//!
//! - [`auth`] builds the authorize URL and parses redirect fragments. It has
//!   no I/O apart from [`SystemBrowser`].
//! - [`requests`] builds endpoint URLs and form bodies from plain values.
//! - [`session`] owns the reqwest client carrying the bearer header.
//! - [`FitbitApi`] ties these to a [`CredentialStore`] and a [`Signals`]
//!   registry.
//!
//! The store is the source of truth for the login state. The session is a
//! cache derived from it: before each call it is checked against the stored
//! token and rebuilt when the token changed. It is dropped when the store no
//! longer holds both the token and the user id.
//!
//! ## Redirect Handling
//!
//! A redirect is only accepted if it starts with the configured callback URL.
//! Fragment keys are matched as substrings by default, so `state=my_user_id`
//! would be read as the user id if it came first. Use
//! [`FragmentMatch::Exact`] to compare parameter names exactly.
//!
//! ## Error Handling
//!
//! Each API call resolves to exactly one outcome: a [`JsonObject`] or a
//! [`FitbitError`].
//!
//! - [`FitbitError::NotLoggedIn`] is returned before any request is sent.
//! - Transport failures, including non-success statuses, are passed through
//!   as [`FitbitError::Transport`]. Expired tokens are not refreshed; they
//!   surface as transport errors (usually `401`).
//! - An empty body is [`FitbitError::NoData`] and anything that is not a JSON
//!   object is [`FitbitError::UnableToParse`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let api = FitbitApi::new(config, MemoryCredentialStore::new());
//! api.subscribe(|event| println!("{event:?}"));
//! api.login(&SystemBrowser)?;
//! // later, from the callback server
//! api.handle_redirect(&redirect_url).await?;
//! let logs = api.get_food_logs().await?;
//! ```

pub mod auth;
pub mod requests;
pub mod session;

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::RequestBuilder;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use crate::{
    errors::{FitbitError, FitbitResult},
    management::{AuthEvent, AuthObserver, CredentialStore, Signals, SubscriptionId},
    types::{ClientConfig, Endpoints, FoodItem, JsonObject},
    utils, warning,
};

pub use auth::{BrowserPresenter, FragmentMatch, RedirectGrant, SystemBrowser};
pub use session::Session;

pub struct FitbitApi<S: CredentialStore> {
    config: ClientConfig,
    endpoints: Endpoints,
    store: S,
    session: RwLock<Option<Session>>,
    signals: Signals,
    fragment_match: FragmentMatch,
}

impl<S: CredentialStore> FitbitApi<S> {
    /// Creates a client. No session is built until [`restore_session`](Self::restore_session)
    /// or a successful [`handle_redirect`](Self::handle_redirect).
    pub fn new(config: ClientConfig, store: S) -> Self {
        Self {
            config,
            endpoints: Endpoints::default(),
            store,
            session: RwLock::new(None),
            signals: Signals::new(),
            fragment_match: FragmentMatch::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_fragment_match(mut self, matching: FragmentMatch) -> Self {
        self.fragment_match = matching;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self, observer: impl AuthObserver + 'static) -> SubscriptionId {
        self.signals.subscribe(Arc::new(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.signals.unsubscribe(id)
    }

    /// Rebuilds the session from previously stored credentials.
    ///
    /// Returns `true` if both the token and the user id were found. A token
    /// without a user id is not enough to log in. Emits no signal.
    pub async fn restore_session(&self) -> FitbitResult<bool> {
        let (Some(token), Some(_)) = (self.store.access_token(), self.store.user_id()) else {
            return Ok(false);
        };

        let session = Session::new(&token)?;
        *self.session.write().await = Some(session);
        Ok(true)
    }

    pub fn authorize_url(&self) -> FitbitResult<Url> {
        auth::authorize_url(&self.config, &self.endpoints)
    }

    /// Presents the authorize page. Login completes later, in
    /// [`handle_redirect`](Self::handle_redirect).
    pub fn login(&self, presenter: &impl BrowserPresenter) -> FitbitResult<Url> {
        let url = self.authorize_url()?;

        if presenter.present(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            );
        }

        Ok(url)
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.access_token().is_some() && self.store.user_id().is_some()
    }

    /// Clears stored credentials and the session, then emits
    /// [`AuthEvent::LoggedOut`]. Safe to call when already logged out.
    pub async fn logout(&self) -> FitbitResult<()> {
        self.store.clear()?;
        *self.session.write().await = None;
        self.signals.emit(AuthEvent::LoggedOut);
        Ok(())
    }

    /// Completes login from the URL the browser was redirected to.
    ///
    /// The URL has to start with the configured callback URL, otherwise
    /// [`FitbitError::UnexpectedRedirect`] is returned. If the fragment lacks
    /// `access_token` or `user_id`, returns [`FitbitError::IncompleteRedirect`].
    /// On either error nothing is stored and no signal is emitted.
    pub async fn handle_redirect(&self, redirect: &str) -> FitbitResult<RedirectGrant> {
        if !auth::is_callback(redirect, &self.config.callback_url) {
            return Err(FitbitError::UnexpectedRedirect);
        }

        let grant = auth::parse_redirect(redirect, self.fragment_match)
            .ok_or(FitbitError::IncompleteRedirect)?;

        let session = Session::new(&grant.access_token)?;
        self.store.set(&grant.access_token, &grant.user_id)?;
        *self.session.write().await = Some(session);

        self.signals.emit(AuthEvent::LoggedIn);
        Ok(grant)
    }

    /// Food logs for today.
    pub async fn get_food_logs(&self) -> FitbitResult<JsonObject> {
        self.get_food_logs_on(utils::today()).await
    }

    pub async fn get_food_logs_on(&self, date: NaiveDate) -> FitbitResult<JsonObject> {
        let session = self.active_session().await?;
        let url = requests::food_logs_url(
            &self.endpoints.api_base,
            self.store.user_id().as_deref(),
            date,
        )?;

        execute(session.client().get(url)).await
    }

    /// Activity summary for today.
    pub async fn get_daily_activity(&self) -> FitbitResult<JsonObject> {
        self.get_daily_activity_on(utils::today()).await
    }

    pub async fn get_daily_activity_on(&self, date: NaiveDate) -> FitbitResult<JsonObject> {
        let session = self.active_session().await?;
        let url = requests::daily_activity_url(
            &self.endpoints.api_base,
            self.store.user_id().as_deref(),
            date,
        )?;

        execute(session.client().get(url)).await
    }

    pub async fn post_food_log(&self, food: &FoodItem) -> FitbitResult<JsonObject> {
        let session = self.active_session().await?;
        let url = requests::post_food_log_url(&self.endpoints.api_base)?;

        execute(
            session
                .client()
                .post(url)
                .form(&requests::food_log_form(food)),
        )
        .await
    }

    /// Returns a session matching the stored token.
    ///
    /// A session built for an older token is rebuilt. Without both a stored
    /// token and user id the session is dropped and the call fails with
    /// `NotLoggedIn`.
    async fn active_session(&self) -> FitbitResult<Session> {
        let (Some(token), Some(_)) = (self.store.access_token(), self.store.user_id()) else {
            *self.session.write().await = None;
            return Err(FitbitError::NotLoggedIn);
        };

        let mut guard = self.session.write().await;
        let rebuilt = match guard.as_ref() {
            None => return Err(FitbitError::NotLoggedIn),
            Some(session) if session.is_for(&token) => return Ok(session.clone()),
            Some(_) => Session::new(&token)?,
        };

        *guard = Some(rebuilt.clone());
        Ok(rebuilt)
    }
}

async fn execute(request: RequestBuilder) -> FitbitResult<JsonObject> {
    let response = request.send().await?.error_for_status()?;
    let body = response.bytes().await?;
    parse_body(&body)
}

/// Interprets a successful response body.
///
/// A missing body is [`FitbitError::NoData`]; any body that is not a JSON
/// object, whitespace included, is [`FitbitError::UnableToParse`].
pub fn parse_body(body: &[u8]) -> FitbitResult<JsonObject> {
    if body.is_empty() {
        return Err(FitbitError::NoData);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(FitbitError::UnableToParse),
    }
}
