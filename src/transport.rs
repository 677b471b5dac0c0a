//! HTTP transport toward the ticketing API.
//!
//! A thin collaborator around the projection pipeline: it ships one
//! payload per group and reports failures to the caller. Retry and
//! backoff are deliberately absent; a failed submission surfaces
//! immediately.

use reqwest::{blocking::Client, StatusCode};
use tracing::debug;

use crate::ticket::TicketPayload;

/// Basic-auth credentials for the ticketing API.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account name used for the basic-auth header.
    pub username: String,
    /// Password for the account. Supplied via the environment, never
    /// persisted.
    pub password: String,
}

/// A blocking client for the ticketing API's issue-creation endpoint.
#[derive(Debug)]
pub struct TicketClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl TicketClient {
    /// Creates a client for the given issue-creation endpoint.
    #[must_use]
    pub fn new(endpoint: String, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            credentials,
        }
    }

    /// Submits one ticket-creation payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be performed or the server
    /// responds with a non-success status.
    pub fn create_issue(&self, payload: &TicketPayload) -> Result<(), Error> {
        debug!(summary = payload.summary(), "submitting ticket");

        let response = self
            .client
            .post(self.endpoint.as_str())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(payload)
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status(status))
        }
    }
}

/// Errors that can occur while talking to the ticketing API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be performed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error("ticketing API responded with status {0}")]
    Status(StatusCode),
}
