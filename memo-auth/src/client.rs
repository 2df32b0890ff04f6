use crate::error::AuthError;
use crate::models::{Credential, ErrorBody, RegisterRequest, User};
use crate::store::CredentialStore;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// HTTP client for the authentication endpoints, paired with the store that
/// holds the resulting credential.
///
/// Cloning is cheap and clones share the same underlying store location, so
/// one login is visible to every clone.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http_client: reqwest::Client,
    base_url: String,
    store: CredentialStore,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, store: CredentialStore) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            store,
        }
    }

    /// Base URL this client was resolved against, for wiring resource clients.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange username and password for a bearer credential and persist it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential, AuthError> {
        let url = format!("{}/token", self.base_url);
        tracing::debug!("Requesting access token for {}", username);

        let response = self
            .http_client
            .post(&url)
            .form(&[("username", username), ("password", password.expose_secret())])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = error_detail(response, "Login failed").await;
            tracing::warn!("Login rejected for {}: {}", username, detail);
            return Err(AuthError::LoginRejected(detail));
        }

        let credential: Credential = response.json().await?;
        self.store.save(&credential)?;
        tracing::info!("Logged in as {}", username);
        Ok(credential)
    }

    /// Create a new account. Does not log in and does not touch the store.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        let url = format!("{}/users/", self.base_url);
        let request = RegisterRequest {
            username,
            email,
            password: password.expose_secret(),
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let detail = error_detail(response, "Registration failed").await;
            tracing::warn!("Registration rejected for {}: {}", username, detail);
            return Err(AuthError::RegistrationRejected(detail));
        }

        tracing::info!("Registered new user {}", username);
        Ok(response.json().await?)
    }

    /// Drop the stored credential. Never fails; a credential that cannot be
    /// removed is reported and forgotten.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear stored credential: {}", e);
        }
    }

    /// Fetch the profile behind the stored credential.
    ///
    /// Returns `Ok(None)` without a network call when no credential is
    /// stored. A 401/403 answer means the credential went stale: the store
    /// is cleared and `Ok(None)` is returned, so callers land in the
    /// anonymous state instead of an error path.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(credential) = self.store.load() else {
            return Ok(None);
        };

        let url = format!("{}/users/me/", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::info!("Stored credential rejected ({}), clearing it", status);
            self.logout();
            return Ok(None);
        }

        if !status.is_success() {
            let detail = error_detail(response, "Request failed").await;
            return Err(AuthError::ProfileFetch(detail));
        }

        Ok(Some(response.json().await?))
    }

    /// Headers for a protected request: `Authorization: Bearer <token>` when
    /// a credential is stored, empty otherwise.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(credential) = self.store.load() {
            match HeaderValue::from_str(&format!("Bearer {}", credential.access_token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("Stored access token is not a valid header value");
                }
            }
        }

        headers
    }

    /// Whether a credential is currently stored. Validity is only confirmed
    /// lazily, by the next protected request.
    pub fn is_authenticated(&self) -> bool {
        self.store.load().is_some()
    }
}

/// Pull the server's `detail` message out of an error response, falling back
/// to a generic message carrying the status code.
async fn error_detail(response: Response, operation: &str) -> String {
    let status = response.status();

    match response.json::<ErrorBody>().await {
        Ok(body) => match body.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        },
        Err(_) => format!("{} with status {}", operation, status),
    }
}
