//! Command report dispatch.

use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::errors::{DispatchError, PayloadError};
use crate::mdm::{Command, Request, decode_command_results};
use crate::service::CommandAndReportResults;

/// Decodes a command report, hands it to the service and returns the raw
/// bytes of the next command.
///
/// `Ok(None)` means the service has nothing further to send; the transport
/// answers with an empty body and the device stops polling. A command with an
/// empty encoding is treated the same way.
///
/// # Errors
///
/// Returns [`DispatchError::Status`] with `400 Bad Request` when the report
/// does not decode, and [`DispatchError::CommandAndReportResults`] when the
/// service fails.
pub fn command_and_report_results_request<S>(
    service: &S,
    request: &Request,
    body: &[u8],
) -> Result<Option<Vec<u8>>, DispatchError>
where
    S: CommandAndReportResults + ?Sized,
{
    let results = decode_command_results(body).map_err(|error| {
        warn!(target: DISPATCH_TARGET, %error, "rejecting command report body");
        DispatchError::bad_request(PayloadError::CommandResults(error))
    })?;

    debug!(
        target: DISPATCH_TARGET,
        status = ?results.status,
        command_uuid = results.command_uuid.as_deref().unwrap_or_default(),
        "dispatching command report"
    );

    let command = service
        .command_and_report_results(request, &results)
        .map_err(|source| DispatchError::CommandAndReportResults { source })?;

    if let Some(next) = &command {
        debug!(
            target: DISPATCH_TARGET,
            command_uuid = next.command_uuid(),
            request_type = next.request_type(),
            "sending next command"
        );
    }

    Ok(command.map(Command::into_raw).filter(|raw| !raw.is_empty()))
}
