//! Mutation boundary between the feed and the API server.
//!
//! [`FeedbackBackend`] is the interface the session issues deletes
//! through; [`HttpBackend`] is the production implementation. Tests
//! script their own backend to exercise success and failure paths
//! without a server.

use serde::Deserialize;

use feedboard_core::feedback::FeedbackItem;
use feedboard_core::types::DbId;

/// Error returned by backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, timeout, bad TLS...).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Issues feedback mutations against the backing service.
#[allow(async_fn_in_trait)]
pub trait FeedbackBackend {
    /// Delete the feedback item with the given id.
    async fn delete_item(&self, id: DbId) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// Response envelope for the snapshot query.
#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    data: Vec<FeedbackItem>,
}

/// Subset of the login response the client needs.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: DbId,
}

/// HTTP implementation of [`FeedbackBackend`] against the Feedboard API.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    /// Bearer token; `None` for an anonymous (read-only) client.
    access_token: Option<String>,
}

impl HttpBackend {
    /// Create an anonymous client. The snapshot query works without a
    /// session; mutations will be rejected by the server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: None,
        }
    }

    /// Log in with email + password, returning an authenticated client
    /// and the session's user id.
    pub async fn login(
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<(Self, DbId), BackendError> {
        let client = reqwest::Client::new();
        let url = format!("{base_url}/api/v1/auth/login");

        let response = client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected { status, message });
        }

        let login: LoginResponse = response.json().await?;
        let user_id = login.user.id;

        Ok((
            Self {
                client,
                base_url: base_url.to_string(),
                access_token: Some(login.access_token),
            },
            user_id,
        ))
    }

    /// Fetch the initial snapshot: all feedback items, newest first.
    pub async fn fetch_snapshot(&self) -> Result<Vec<FeedbackItem>, BackendError> {
        let url = format!("{}/api/v1/feedback", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected { status, message });
        }

        let snapshot: SnapshotResponse = response.json().await?;
        Ok(snapshot.data)
    }
}

impl FeedbackBackend for HttpBackend {
    async fn delete_item(&self, id: DbId) -> Result<(), BackendError> {
        let url = format!("{}/api/v1/feedback/{id}", self.base_url);

        let mut request = self.client.delete(&url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected { status, message });
        }

        Ok(())
    }
}
