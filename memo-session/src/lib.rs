mod manager;
mod session;

pub use manager::{Authenticator, SessionManager};
pub use session::Session;

// Always expose testing module (integration tests need it)
pub mod testing;

use memo_auth::{AuthClient, AuthError, CredentialStore, Settings};

/// Wire up a session manager from configuration: resolve the backend base
/// URL, open the default credential store, and hydrate any persisted
/// session before returning.
pub async fn start() -> Result<SessionManager<AuthClient>, AuthError> {
    let settings = Settings::new()?;
    settings.validate().map_err(AuthError::Configuration)?;

    let store = CredentialStore::new()?;
    let auth = AuthClient::new(settings.resolve_base_url(), store);

    let mut manager = SessionManager::new(auth);
    manager.hydrate().await;

    Ok(manager)
}
