use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::HeaderMap, response::Html};

use crate::{fitbit::FitbitApi, management::CredentialStore, warning};

/// The implicit grant puts the token in the URL fragment, which browsers never
/// send to the server. This page forwards the full URL to `/token`.
const CALLBACK_PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <h4>Completing login...</h4>
    <script>
      fetch("/token?redirect=" + encodeURIComponent(window.location.href))
        .then(function (res) { return res.text(); })
        .then(function (html) { document.body.innerHTML = html; })
        .catch(function () { document.body.innerHTML = "<h4>Login failed.</h4>"; });
    </script>
  </body>
</html>"#;

pub async fn callback() -> Html<&'static str> {
    Html(CALLBACK_PAGE)
}

/// Only the callback page itself may complete a login. Browsers that send
/// `Sec-Fetch-Site` must report a same-origin request.
fn is_same_origin(headers: &HeaderMap) -> bool {
    match headers.get("sec-fetch-site") {
        Some(site) => site.as_bytes() == b"same-origin",
        None => true,
    }
}

pub async fn token<S: CredentialStore + 'static>(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Extension(api): Extension<Arc<FitbitApi<S>>>,
) -> Html<&'static str> {
    if !is_same_origin(&headers) {
        warning!("Rejected cross-site request to /token");
        return Html("<h4>Login failed.</h4>");
    }

    let Some(redirect) = params.get("redirect") else {
        return Html("<h4>Missing redirect URL.</h4>");
    };

    match api.handle_redirect(redirect).await {
        Ok(_) => Html("<h2>Authentication successful.</h2><p>Close browser window.</p>"),
        Err(e) => {
            warning!("Handling redirect failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
