//! Service capabilities invoked by the dispatchers.
//!
//! Check-in handling and the command loop are independent capabilities: a
//! deployment may implement either without the other. Implementations must
//! be safe to share between threads because the transport layer calls the
//! dispatchers concurrently with one service value.

use std::error::Error;

use crate::mdm::{Authenticate, CheckOut, Command, CommandResults, Request, TokenUpdate};

/// Error returned by service implementations.
///
/// Services may return a [`crate::StatusError`] to assert the transport
/// status themselves; any other error is left for the outer layer to
/// classify.
pub type ServiceError = Box<dyn Error + Send + Sync + 'static>;

/// Handles the check-in phase of the protocol.
pub trait Checkin: Send + Sync {
    /// Records an enrollment handshake.
    fn authenticate(&self, request: &Request, message: &Authenticate) -> Result<(), ServiceError>;

    /// Records new or refreshed push credentials.
    fn token_update(&self, request: &Request, message: &TokenUpdate) -> Result<(), ServiceError>;

    /// Records that a device left management.
    fn check_out(&self, request: &Request, message: &CheckOut) -> Result<(), ServiceError>;
}

/// Handles the command-and-report loop of the protocol.
pub trait CommandAndReportResults: Send + Sync {
    /// Stores the outcome in `results` and selects the next command, if any.
    fn command_and_report_results(
        &self,
        request: &Request,
        results: &CommandResults,
    ) -> Result<Option<Command>, ServiceError>;
}

/// A service implementing the full protocol on one type.
pub trait CheckinAndCommandService: Checkin + CommandAndReportResults {}

impl<T> CheckinAndCommandService for T where T: Checkin + CommandAndReportResults {}
