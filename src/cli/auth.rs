use std::{sync::Arc, time::Duration};

use tokio::sync::Notify;

use crate::{
    config, error,
    fitbit::SystemBrowser,
    info,
    management::{AuthEvent, CredentialStore},
    server::start_api_server,
    success,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the implicit-grant login: starts the callback server, opens the
/// authorize page and waits for the redirect to arrive.
pub async fn auth() {
    let api = Arc::new(super::build_api());

    let logged_in = Arc::new(Notify::new());
    let notify = Arc::clone(&logged_in);
    api.subscribe(move |event: AuthEvent| {
        if event == AuthEvent::LoggedIn {
            notify.notify_one();
        }
    });

    let server_api = Arc::clone(&api);
    let addr = config::server_addr();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_api, &addr).await {
            error!("Callback server failed: {}", e);
        }
    });

    match api.login(&SystemBrowser) {
        Ok(url) => info!("Waiting for authorization at {}", url),
        Err(e) => error!("Cannot build authorize URL: {}", e),
    }

    match tokio::time::timeout(LOGIN_TIMEOUT, logged_in.notified()).await {
        Ok(()) => {
            let user = api.store().user_id().unwrap_or_default();
            success!("Authentication successful! Logged in as {}", user);
        }
        Err(_) => error!("Authentication failed or timed out."),
    }
}

/// Completes login from a redirect URL copied out of the browser.
pub async fn redirect(url: String) {
    let api = super::build_api();

    match api.handle_redirect(&url).await {
        Ok(grant) => success!("Logged in as {}", grant.user_id),
        Err(e) => error!("Cannot complete login: {}", e),
    }
}

pub async fn logout() {
    let api = super::build_api();

    match api.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Cannot clear credentials: {}", e),
    }
}

pub async fn status() {
    let api = super::build_api();

    if api.is_logged_in() {
        let user = api.store().user_id().unwrap_or_default();
        success!("Logged in as {}", user);
    } else {
        info!("Not logged in. Run fitbitcli auth.");
    }
}
