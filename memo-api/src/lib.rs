mod error;
pub mod notes;

pub use crate::error::MemoApiError;
use crate::error::api_error;
use memo_auth::AuthClient;
use notes::{NewNote, Note};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the notes endpoints.
///
/// Every request picks up its `Authorization` header from the auth client at
/// send time, so a login or logout elsewhere in the process is reflected on
/// the next call without rebuilding anything.
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
    auth: AuthClient,
}

impl Client {
    pub fn new(base_url: impl Into<String>, auth: AuthClient) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Fetch all notes belonging to the authenticated user.
    pub async fn list_notes(&self) -> Result<Vec<Note>, MemoApiError> {
        let url = format!("{}/notes/", self.base_url);
        tracing::debug!("Listing notes");

        let response = self
            .http_client
            .get(&url)
            .headers(self.auth.auth_headers())
            .send()
            .await?;

        parse(response).await
    }

    /// Create a note and return it as stored, with id and timestamps filled
    /// in by the server.
    pub async fn create_note(&self, title: &str, content: &str) -> Result<Note, MemoApiError> {
        let url = format!("{}/notes/", self.base_url);
        tracing::debug!("Creating note {:?}", title);

        let response = self
            .http_client
            .post(&url)
            .headers(self.auth.auth_headers())
            .json(&NewNote::new(title, content))
            .send()
            .await?;

        parse(response).await
    }

    /// Fetch a single note by id.
    pub async fn get_note(&self, id: i64) -> Result<Note, MemoApiError> {
        let url = format!("{}/notes/{}", self.base_url, id);

        let response = self
            .http_client
            .get(&url)
            .headers(self.auth.auth_headers())
            .send()
            .await?;

        parse(response).await
    }

    /// Delete a note by id. Whether the id still exists is the server's
    /// verdict; a 404 comes back as an `Api` error like any other.
    pub async fn delete_note(&self, id: i64) -> Result<(), MemoApiError> {
        let url = format!("{}/notes/{}", self.base_url, id);
        tracing::debug!("Deleting note {}", id);

        let response = self
            .http_client
            .delete(&url)
            .headers(self.auth.auth_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, MemoApiError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    Ok(response.json().await?)
}
