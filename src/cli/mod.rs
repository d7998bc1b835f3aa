//! # CLI Module
//!
//! User-facing commands of `fitbitcli`. Each command builds a
//! [`FitbitApi`] from the environment, does its work and reports through the
//! console macros.
//!
//! ## Architecture
//!
//! Commands share two constructors:
//!
//! - `build_api` reads [`config::client_config`], [`config::endpoints`] and
//!   [`config::fitbit_fragment_match`] and opens the
//!   [`FileCredentialStore`] in the local data directory.
//! - `connected_api` additionally restores the stored session and refuses to
//!   continue unless both the access token and the user id are present.
//!
//! Data commands show a spinner while the request runs, then render the
//! response as a table. `--json` prints the raw response object instead.
//!
//! ## Error Handling
//!
//! Nothing here returns an error to `main`. Configuration problems, a missing
//! login and failed requests are reported with `error!`, which prints the
//! message and exits with status 1. A `401` from Fitbit is reported as an
//! expired login with a hint to run `fitbitcli auth` again.
//!
//! ## Commands
//!
//! - [`auth`] - Log in through the browser and the local callback server
//! - [`redirect`] - Log in from a pasted redirect URL
//! - [`logout`] - Forget stored credentials
//! - [`status`] - Show whether credentials are stored
//! - [`foods`] - Show food logs for a day
//! - [`activity`] - Show the activity summary for a day
//! - [`log_food`] - Log a catalog food or a custom food
//!
//! ## Usage
//!
//! ```bash
//! fitbitcli auth
//! fitbitcli foods --date 2017-07-29
//! fitbitcli log-food --name "Apple" --calories 95 --meal afternoon-snack --unit 304 --amount 1
//! ```

mod activity;
mod auth;
mod foods;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use activity::activity;
pub use auth::auth;
pub use auth::logout;
pub use auth::redirect;
pub use auth::status;
pub use foods::LogFoodArgs;
pub use foods::foods;
pub use foods::log_food;

use crate::{
    config, error,
    errors::FitbitError,
    fitbit::FitbitApi,
    management::FileCredentialStore,
    types::JsonObject,
};

fn build_api() -> FitbitApi<FileCredentialStore> {
    let client_config = match config::client_config() {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };
    let endpoints = match config::endpoints() {
        Ok(e) => e,
        Err(e) => error!("{}", e),
    };
    let fragment_match = match config::fitbit_fragment_match() {
        Ok(m) => m,
        Err(e) => error!("{}", e),
    };
    let store = match FileCredentialStore::open_default() {
        Ok(s) => s,
        Err(e) => error!("Cannot open credential store: {}", e),
    };

    FitbitApi::new(client_config, store)
        .with_endpoints(endpoints)
        .with_fragment_match(fragment_match)
}

/// Builds the client and restores the stored session, exiting if there is none.
async fn connected_api() -> FitbitApi<FileCredentialStore> {
    let api = build_api();

    match api.restore_session().await {
        Ok(true) if api.is_logged_in() => api,
        Ok(_) => error!("Not logged in. Run fitbitcli auth."),
        Err(e) => error!("Cannot restore session: {}", e),
    }
}

fn request_failed(context: &str, e: FitbitError) -> ! {
    if e.needs_login() {
        error!("{}: login expired or revoked. Run fitbitcli auth.", context);
    }
    error!("{}. Err: {}", context, e);
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

fn print_json(object: &JsonObject) {
    match serde_json::to_string_pretty(object) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Cannot render response: {}", e),
    }
}
