//! Transport-facing rendering of dispatch results.
//!
//! The dispatchers decide status only for bodies they reject. Everything
//! else is classified here: an embedded [`crate::StatusError`] wins, and
//! failures without one fall back to the configured unclassified status.

use http::StatusCode;
use http::status::InvalidStatusCode;
use thiserror::Error;
use tracing::{error, warn};

use mdm_config::Config;

use crate::dispatch::DispatchError;

/// Tracing target for response rendering.
const RESPONSE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::response");

/// Status and body to write back to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Transport status.
    pub status: StatusCode,
    /// Response body; empty for acknowledgements and drained queues.
    pub body: Vec<u8>,
}

/// Errors raised while building a [`ResponsePolicy`].
#[derive(Debug, Error)]
pub enum ResponsePolicyError {
    /// The configured unclassified status is not a valid status code.
    #[error("invalid unclassified status {status}: {source}")]
    InvalidStatus {
        /// Configured value.
        status: u16,
        /// Parse failure from `http`.
        #[source]
        source: InvalidStatusCode,
    },
}

/// Maps dispatch results onto transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    unclassified: StatusCode,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl ResponsePolicy {
    /// Creates a policy reporting `unclassified` for errors without a status.
    pub fn new(unclassified: StatusCode) -> Self {
        Self { unclassified }
    }

    /// Builds the policy from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResponsePolicyError::InvalidStatus`] when
    /// `unclassified_status` is outside `100..=999`.
    pub fn from_config(config: &Config) -> Result<Self, ResponsePolicyError> {
        let status = config.unclassified_status();
        StatusCode::from_u16(status)
            .map(Self::new)
            .map_err(|source| ResponsePolicyError::InvalidStatus { status, source })
    }

    /// Status reported for errors that carry none.
    pub fn unclassified(&self) -> StatusCode {
        self.unclassified
    }

    /// Chooses the status for a dispatch error.
    pub fn status_for(&self, error: &DispatchError) -> StatusCode {
        error.status().unwrap_or(self.unclassified)
    }

    /// Converts a dispatcher result into a response.
    ///
    /// Successful dispatches answer `200 OK` with the returned body (empty
    /// when there is none). Failures answer with their status and its reason
    /// phrase; the full error chain is logged, never sent to the device.
    pub fn render(&self, result: Result<Option<Vec<u8>>, DispatchError>) -> Response {
        match result {
            Ok(body) => Response {
                status: StatusCode::OK,
                body: body.unwrap_or_default(),
            },
            Err(failure) => {
                let status = self.status_for(&failure);
                if status.is_server_error() {
                    error!(
                        target: RESPONSE_TARGET,
                        status = status.as_u16(),
                        error = %failure,
                        "dispatch failed"
                    );
                } else {
                    warn!(
                        target: RESPONSE_TARGET,
                        status = status.as_u16(),
                        error = %failure,
                        "dispatch rejected"
                    );
                }
                let reason = status.canonical_reason().unwrap_or("Unknown Status");
                Response {
                    status,
                    body: format!("{reason}\n").into_bytes(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::dispatch::{PayloadError, StatusError};
    use crate::mdm::DecodeError;
    use crate::tests::support::StoreError;

    #[test]
    fn success_with_body_is_ok() {
        let response = ResponsePolicy::default().render(Ok(Some(b"command".to_vec())));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"command");
    }

    #[test]
    fn acknowledgement_is_empty_ok() {
        let response = ResponsePolicy::default().render(Ok(None));
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
    }

    #[test]
    fn decode_failures_render_bad_request() {
        let error = DispatchError::bad_request(PayloadError::Checkin(DecodeError::Empty));
        let response = ResponsePolicy::default().render(Err(error));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, b"Bad Request\n");
    }

    #[rstest]
    #[case::default(ResponsePolicy::default(), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::custom(ResponsePolicy::new(StatusCode::SERVICE_UNAVAILABLE), StatusCode::SERVICE_UNAVAILABLE)]
    fn unclassified_failures_use_policy_default(
        #[case] policy: ResponsePolicy,
        #[case] expected: StatusCode,
    ) {
        let error = DispatchError::Authenticate {
            source: Box::new(StoreError("down")),
        };
        let response = policy.render(Err(error));
        assert_eq!(response.status, expected);
    }

    #[test]
    fn service_status_overrides_default() {
        let error = DispatchError::TokenUpdate {
            source: Box::new(StatusError::new(StatusCode::FORBIDDEN, StoreError("denied"))),
        };
        assert_eq!(
            ResponsePolicy::default().status_for(&error),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn builds_from_config() {
        let config = Config {
            unclassified_status: 502,
            ..Config::default()
        };
        let policy = ResponsePolicy::from_config(&config).expect("valid status");
        assert_eq!(policy.unclassified(), StatusCode::BAD_GATEWAY);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::too_large(1000)]
    fn rejects_invalid_configured_status(#[case] status: u16) {
        let config = Config {
            unclassified_status: status,
            ..Config::default()
        };
        let error = ResponsePolicy::from_config(&config).expect_err("invalid status");
        assert!(matches!(
            error,
            ResponsePolicyError::InvalidStatus { status: rejected, .. } if rejected == status
        ));
    }
}
