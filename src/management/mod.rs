mod credentials;
mod signals;

pub use credentials::CredentialStore;
pub use credentials::FileCredentialStore;
pub use credentials::MemoryCredentialStore;
pub use signals::AuthEvent;
pub use signals::AuthObserver;
pub use signals::Signals;
pub use signals::SubscriptionId;
