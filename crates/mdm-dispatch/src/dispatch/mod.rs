//! Dispatch of raw protocol bodies to service capabilities.
//!
//! The transport layer hands each dispatcher an already-authenticated body
//! together with the request context. A dispatcher decodes the body, routes
//! it to exactly one service method and returns the response body (if any).
//!
//! ## Error classification
//!
//! Bodies that fail to decode, including check-ins whose `MessageType` is not
//! recognised, are rejected with a [`StatusError`] carrying `400 Bad Request`.
//! Service failures are wrapped with the name of the failing stage but keep
//! whatever status the service attached, so the caller decides the default.
//!
//! Both dispatchers are stateless: concurrent calls are safe whenever the
//! injected service is.

mod checkin;
mod command;
mod errors;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

pub use self::checkin::checkin_request;
pub use self::command::command_and_report_results_request;
pub use self::errors::{BoxError, DispatchError, PayloadError, StatusError, find_status};
