//! Check-in dispatch.

use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::errors::{DispatchError, PayloadError};
use crate::mdm::{CheckinMessage, Request, decode_checkin};
use crate::service::Checkin;

/// Decodes a check-in body and invokes the matching [`Checkin`] method.
///
/// Check-in is acknowledged with an empty body, so success is always
/// `Ok(None)`.
///
/// # Errors
///
/// Returns [`DispatchError::Status`] with `400 Bad Request` when the body
/// does not decode or names an unrecognised message type, and the stage
/// variant for the invoked method when the service fails.
pub fn checkin_request<S>(
    service: &S,
    request: &Request,
    body: &[u8],
) -> Result<Option<Vec<u8>>, DispatchError>
where
    S: Checkin + ?Sized,
{
    let message = decode_checkin(body).map_err(|error| {
        warn!(target: DISPATCH_TARGET, %error, "rejecting check-in body");
        DispatchError::bad_request(PayloadError::Checkin(error))
    })?;

    debug!(
        target: DISPATCH_TARGET,
        message_type = message.message_type().as_str(),
        "dispatching check-in"
    );

    match &message {
        CheckinMessage::Authenticate(authenticate) => service
            .authenticate(request, authenticate)
            .map_err(|source| DispatchError::Authenticate { source })?,
        CheckinMessage::TokenUpdate(token_update) => service
            .token_update(request, token_update)
            .map_err(|source| DispatchError::TokenUpdate { source })?,
        CheckinMessage::CheckOut(check_out) => service
            .check_out(request, check_out)
            .map_err(|source| DispatchError::CheckOut { source })?,
    }

    Ok(None)
}
