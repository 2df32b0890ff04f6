mod client;
mod error;
mod models;
mod settings;
mod store;

pub use client::AuthClient;
pub use error::AuthError;
pub use models::{Credential, User};
pub use settings::Settings;
pub use store::CredentialStore;
