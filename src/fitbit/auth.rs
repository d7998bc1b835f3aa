use std::{io, str::FromStr};

use url::Url;

use crate::{
    errors::{FitbitError, FitbitResult},
    types::{ClientConfig, Endpoints, Scope},
};

/// Requested token lifetime in seconds (one year, the longest Fitbit grants).
pub const TOKEN_LIFETIME_SECS: u64 = 31_536_000;

const AUTHORIZE_PATH: &str = "/oauth2/authorize";

/// Builds the implicit-grant authorize URL.
///
/// The query carries exactly `response_type`, `client_id`, `redirect_uri`,
/// `scope` and `expires_in`. Values are percent-encoded, so the space between
/// scopes is sent as `%20`.
///
/// # Example
///
/// ```
/// let config = ClientConfig::new("22ABCD", "myapp://callback", [Scope::Nutrition]);
/// let url = authorize_url(&config, &Endpoints::default())?;
/// assert!(url.as_str().starts_with("https://www.fitbit.com/oauth2/authorize?"));
/// ```
pub fn authorize_url(config: &ClientConfig, endpoints: &Endpoints) -> FitbitResult<Url> {
    let scope = config
        .scopes()
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let mut url = endpoints
        .auth_base
        .join(AUTHORIZE_PATH)
        .map_err(|_| FitbitError::InvalidUrl)?;

    let query = format!(
        "response_type=token&client_id={client_id}&redirect_uri={redirect_uri}&scope={scope}&expires_in={expires_in}",
        client_id = urlencoding::encode(&config.client_id),
        redirect_uri = urlencoding::encode(&config.callback_url),
        scope = urlencoding::encode(&scope),
        expires_in = TOKEN_LIFETIME_SECS,
    );
    url.set_query(Some(&query));

    Ok(url)
}

/// How fragment segments are matched against `access_token` / `user_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FragmentMatch {
    /// First segment that contains the key anywhere. A value that embeds the
    /// other key's name can be picked up by mistake.
    #[default]
    Substring,
    /// First segment whose name is exactly the key.
    Exact,
}

impl FromStr for FragmentMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(FragmentMatch::Substring),
            "exact" => Ok(FragmentMatch::Exact),
            other => Err(format!("unknown fragment match '{other}' (expected substring or exact)")),
        }
    }
}

/// Token and user id taken from a redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectGrant {
    pub access_token: String,
    pub user_id: String,
}

/// True if `redirect` is `callback_url` itself, optionally followed by a
/// query or fragment.
pub fn is_callback(redirect: &str, callback_url: &str) -> bool {
    match redirect.strip_prefix(callback_url) {
        Some(rest) => rest.is_empty() || rest.starts_with('#') || rest.starts_with('?'),
        None => false,
    }
}

/// Extracts `access_token` and `user_id` from the fragment of `redirect`.
///
/// Returns `None` unless both are present and non-empty.
pub fn parse_redirect(redirect: &str, matching: FragmentMatch) -> Option<RedirectGrant> {
    let (_, fragment) = redirect.split_once('#')?;
    let segments: Vec<&str> = fragment.split('&').collect();

    let access_token = fragment_value(&segments, "access_token", matching)?;
    let user_id = fragment_value(&segments, "user_id", matching)?;

    Some(RedirectGrant {
        access_token: access_token.to_string(),
        user_id: user_id.to_string(),
    })
}

fn fragment_value<'a>(segments: &[&'a str], key: &str, matching: FragmentMatch) -> Option<&'a str> {
    let segment = segments.iter().find(|segment| match matching {
        FragmentMatch::Substring => segment.contains(key),
        FragmentMatch::Exact => segment.split('=').next() == Some(key),
    })?;

    segment.split('=').nth(1).filter(|value| !value.is_empty())
}

/// Shows the authorize page to the user. The page eventually redirects to
/// the callback URL, which has to be fed back into
/// [`FitbitApi::handle_redirect`](crate::fitbit::FitbitApi::handle_redirect).
pub trait BrowserPresenter {
    fn present(&self, url: &Url) -> io::Result<()>;
}

/// Opens the system default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserPresenter for SystemBrowser {
    fn present(&self, url: &Url) -> io::Result<()> {
        webbrowser::open(url.as_str())
    }
}
