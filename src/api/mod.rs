//! # API Module
//!
//! HTTP endpoints served by the local callback server during `fitbitcli auth`.
//!
//! - [`callback`] - Landing page for the OAuth redirect. Because the implicit
//!   grant returns the token in the URL fragment, the page sends its own URL
//!   on to [`token`].
//! - [`token`] - Runs the redirect handler on the forwarded URL.
//! - [`health`] - Status and version for quick checks.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use fitbitcli::api::{callback, health, token};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/token", get(token::<FileCredentialStore>).layer(Extension(api)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use callback::token;
pub use health::health;
