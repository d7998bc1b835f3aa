//! Fitbit Web API CLI Library
//!
//! This library provides a small client for the Fitbit Web API: OAuth 2.0
//! implicit-grant login, credential persistence, and calls for reading food
//! logs and daily activity and for logging food.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `errors` - The `FitbitError` type shared by all API operations
//! - `fitbit` - Fitbit Web API client, session and URL builders
//! - `management` - Credential storage and login state signals
//! - `server` - Local HTTP server for OAuth callbacks
//! - `types` - Data structures and type definitions
//! - `utils` - Date handling, argument parsing and response summaries
//!
//! # Example
//!
//! ```
//! use fitbitcli::{config, fitbit::FitbitApi, management::FileCredentialStore};
//!
//! #[tokio::main]
//! async fn main() -> fitbitcli::Res<()> {
//!     config::load_env().await?;
//!     let api = FitbitApi::new(config::client_config()?, FileCredentialStore::open_default()?);
//!     api.restore_session().await?;
//!     let logs = api.get_food_logs().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fitbit;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

/// Boxed-error result used by the CLI layer, where errors from different
/// sources (I/O, HTTP server, Fitbit API) meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Fetching food logs for {}", date);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only for unrecoverable errors in the CLI; library code returns
/// [`errors::FitbitError`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`.
///
/// ```
/// warning!("Failed to open browser, open {} manually", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
