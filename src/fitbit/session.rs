use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::errors::{FitbitError, FitbitResult};

/// An HTTP client that sends `Authorization: Bearer <token>` on every request.
///
/// A session is tied to the token it was built with; build a new one whenever
/// the stored token changes.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    token: String,
}

impl Session {
    pub fn new(access_token: &str) -> FitbitResult<Self> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| FitbitError::Session(e.to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FitbitError::Transport)?;

        Ok(Self {
            client,
            token: access_token.to_string(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// True if this session was built for `access_token`.
    pub fn is_for(&self, access_token: &str) -> bool {
        self.token == access_token
    }
}
