use axum::response::Json;
use serde_json::{Value, json};

/// Liveness of the callback server while `fitbitcli auth` is waiting.
pub async fn health() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
