//! Best-effort command dispatch to the device controller
//!
//! Dispatch is fire-and-forget relative to the user-facing response: a
//! timeout, a refused connection, or a non-success status is logged and
//! recorded, never surfaced to the client. No retries.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::intent::NO_COMMAND;
use crate::{Error, Result};

/// Upper bound on one controller call
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Request body for the controller's `/action` endpoint
#[derive(Serialize)]
struct ActionRequest<'a> {
    command: &'a str,
}

/// Outcome of one dispatch attempt
///
/// Request-scoped; exists only for logging and tests, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether an outbound call was made at all
    pub attempted: bool,
    /// Whether the controller answered with a success status
    pub succeeded: bool,
    /// Controller status code, when a response was received
    pub status_code: Option<u16>,
}

impl DispatchOutcome {
    /// Outcome for a `"none"` command: nothing to send
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            attempted: false,
            succeeded: false,
            status_code: None,
        }
    }
}

/// Delivers command tokens to the remote device controller
#[derive(Debug, Clone)]
pub struct DeviceDispatcher {
    client: Client,
    base_url: String,
}

impl DeviceDispatcher {
    /// Create a dispatcher for a controller base URL (e.g. `http://192.168.4.1`)
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DISPATCH_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Send a command token to the controller
    ///
    /// A `"none"` token performs no outbound call. Failures are logged and
    /// reflected in the outcome; this never returns an error.
    pub async fn dispatch(&self, command: &str) -> DispatchOutcome {
        if command == NO_COMMAND {
            return DispatchOutcome::skipped();
        }

        let url = format!("{}/action", self.base_url);

        let result = self
            .client
            .post(&url)
            .json(&ActionRequest { command })
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    tracing::info!(command = %command, status = %status, "command sent to controller");
                } else {
                    tracing::warn!(command = %command, status = %status, "controller rejected command");
                }
                DispatchOutcome {
                    attempted: true,
                    succeeded: status.is_success(),
                    status_code: Some(status.as_u16()),
                }
            }
            Err(e) => {
                tracing::warn!(command = %command, error = %e, "failed to reach controller");
                DispatchOutcome {
                    attempted: true,
                    succeeded: false,
                    status_code: None,
                }
            }
        }
    }
}
