//! Configuration management for the Fitbit client.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Variables already set in the process
//! environment take precedence over the file.

use std::{env, path::PathBuf};

use url::Url;

use crate::{
    errors::{FitbitError, FitbitResult},
    fitbit::FragmentMatch,
    types::{ClientConfig, Endpoints, FITBIT_API_BASE, FITBIT_AUTH_BASE, Scope},
    utils,
};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_SCOPES: &str = "nutrition activity";

/// Loads environment variables from `fitbitcli/.env` in the local data directory.
///
/// - Linux: `~/.local/share/fitbitcli/.env`
/// - macOS: `~/Library/Application Support/fitbitcli/.env`
/// - Windows: `%LOCALAPPDATA%/fitbitcli/.env`
///
/// A missing file is not an error; the environment alone may be enough.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("fitbitcli/.env");
    path
}

fn required(key: &str) -> FitbitResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(FitbitError::config(format!("{key} must be set"))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// The client id issued when registering the application with Fitbit.
pub fn fitbit_client_id() -> FitbitResult<String> {
    required("FITBIT_CLIENT_ID")
}

/// Must match the redirect URI registered with Fitbit.
pub fn fitbit_redirect_uri() -> FitbitResult<String> {
    required("FITBIT_REDIRECT_URI")
}

/// `FITBIT_SCOPES`, space or comma separated. Defaults to `nutrition activity`.
pub fn fitbit_scopes() -> FitbitResult<Vec<Scope>> {
    utils::parse_scopes(&optional("FITBIT_SCOPES", DEFAULT_SCOPES)).map_err(FitbitError::config)
}

/// Bind address of the local callback server.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// `FITBIT_FRAGMENT_MATCH`: `substring` (default) or `exact`.
pub fn fitbit_fragment_match() -> FitbitResult<FragmentMatch> {
    optional("FITBIT_FRAGMENT_MATCH", "substring")
        .parse()
        .map_err(FitbitError::config)
}

pub fn fitbit_auth_url() -> FitbitResult<Url> {
    let raw = optional("FITBIT_AUTH_URL", FITBIT_AUTH_BASE);
    Url::parse(&raw).map_err(|e| FitbitError::config(format!("FITBIT_AUTH_URL: {e}")))
}

pub fn fitbit_api_url() -> FitbitResult<Url> {
    let raw = optional("FITBIT_API_URL", FITBIT_API_BASE);
    Url::parse(&raw).map_err(|e| FitbitError::config(format!("FITBIT_API_URL: {e}")))
}

pub fn client_config() -> FitbitResult<ClientConfig> {
    Ok(ClientConfig::new(
        fitbit_client_id()?,
        fitbit_redirect_uri()?,
        fitbit_scopes()?,
    ))
}

pub fn endpoints() -> FitbitResult<Endpoints> {
    Ok(Endpoints::new(fitbit_auth_url()?, fitbit_api_url()?))
}
