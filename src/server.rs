use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};

use crate::{Res, api, fitbit::FitbitApi, management::CredentialStore};

pub fn router<S: CredentialStore + 'static>(api: Arc<FitbitApi<S>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/token", get(api::token::<S>).layer(Extension(api)))
}

/// Serves the OAuth callback endpoints on `addr` until the task is dropped.
pub async fn start_api_server<S: CredentialStore + 'static>(
    api: Arc<FitbitApi<S>>,
    addr: &str,
) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address '{addr}': {e}"))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(api)).await?;
    Ok(())
}
