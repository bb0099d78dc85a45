//! Error types for check-in and command report dispatch.
//!
//! Decode failures are client faults by definition of the protocol, so the
//! dispatchers wrap them in a [`StatusError`] carrying `400 Bad Request`.
//! Service failures only gain a description of the failing stage; whatever
//! classification the service attached travels through unchanged.

use std::error::Error;
use std::fmt;

use http::StatusCode;
use thiserror::Error;

use crate::mdm::DecodeError;
use crate::service::ServiceError;

/// Boxed cause carried by a [`StatusError`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Pairs an underlying error with the transport status it should produce.
///
/// The status is an [`http::StatusCode`], so an unset or out-of-range status
/// cannot be constructed. [`Error::source`] returns the cause unchanged, which
/// keeps chain walkers and downcasts working through the wrapper.
#[derive(Debug)]
pub struct StatusError {
    status: StatusCode,
    source: BoxError,
}

impl StatusError {
    /// Wraps `source` with an explicit transport status.
    pub fn new(status: StatusCode, source: impl Into<BoxError>) -> Self {
        Self {
            status,
            source: source.into(),
        }
    }

    /// Wraps `source` as a `400 Bad Request`.
    pub fn bad_request(source: impl Into<BoxError>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, source)
    }

    /// Transport status asserted for the cause.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Borrows the wrapped cause.
    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Unwraps the cause, discarding the status.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP status {} ({}): {}",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Unknown Status"),
            self.source
        )
    }
}

impl Error for StatusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let source: &(dyn Error + 'static) = &*self.source;
        Some(source)
    }
}

/// Context attached to decode failures before they are classified.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// A check-in body failed to decode.
    #[error("decoding check-in: {0}")]
    Checkin(#[source] DecodeError),

    /// A command report body failed to decode.
    #[error("decoding command results: {0}")]
    CommandResults(#[source] DecodeError),
}

impl PayloadError {
    /// Decoder error behind this context.
    pub fn decode_error(&self) -> &DecodeError {
        match self {
            Self::Checkin(error) | Self::CommandResults(error) => error,
        }
    }
}

/// Errors surfaced by the dispatchers.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The body was rejected before reaching a service.
    #[error("{0}")]
    Status(#[source] StatusError),

    /// The `Authenticate` handler failed.
    #[error("authenticate service: {source}")]
    Authenticate {
        #[source]
        source: ServiceError,
    },

    /// The `TokenUpdate` handler failed.
    #[error("tokenupdate service: {source}")]
    TokenUpdate {
        #[source]
        source: ServiceError,
    },

    /// The `CheckOut` handler failed.
    #[error("checkout service: {source}")]
    CheckOut {
        #[source]
        source: ServiceError,
    },

    /// The command report handler failed.
    #[error("command and report results service: {source}")]
    CommandAndReportResults {
        #[source]
        source: ServiceError,
    },
}

impl DispatchError {
    /// Creates a `400 Bad Request` error for an undecodable body.
    pub fn bad_request(payload: PayloadError) -> Self {
        Self::Status(StatusError::bad_request(payload))
    }

    /// Returns the transport status asserted for this error.
    ///
    /// Decode failures always report `400`. Service failures report the
    /// status of the first [`StatusError`] in their source chain, or `None`
    /// when the service left classification to the caller.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(error) => Some(error.status()),
            Self::Authenticate { source }
            | Self::TokenUpdate { source }
            | Self::CheckOut { source }
            | Self::CommandAndReportResults { source } => find_status(source.as_ref()),
        }
    }

    /// Returns the service error behind a service-stage failure.
    pub fn service_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Status(_) => None,
            Self::Authenticate { source }
            | Self::TokenUpdate { source }
            | Self::CheckOut { source }
            | Self::CommandAndReportResults { source } => Some(source.as_ref()),
        }
    }

    /// Returns the decoder error behind a rejected body.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        let Self::Status(error) = self else {
            return None;
        };
        error
            .get_ref()
            .downcast_ref::<PayloadError>()
            .map(PayloadError::decode_error)
    }
}

/// Walks `error` and its sources, returning the first asserted status.
pub fn find_status(error: &(dyn Error + 'static)) -> Option<StatusCode> {
    let mut current = Some(error);
    while let Some(candidate) = current {
        if let Some(status_error) = candidate.downcast_ref::<StatusError>() {
            return Some(status_error.status());
        }
        current = candidate.source();
    }
    None
}
