//! Protocol message model and property list decoding.
//!
//! Check-in bodies decode into the closed [`CheckinMessage`] union; command
//! reports decode into a single [`CommandResults`] structure. Services answer
//! reports with a [`Command`] whose raw bytes become the response body.

mod checkin;
mod command;
mod document;
mod enrollment;
mod errors;
mod request;

pub use self::checkin::{
    Authenticate, CheckOut, CheckinMessage, MessageType, TokenUpdate, decode_checkin,
};
pub use self::command::{
    Command, CommandResults, CommandStatus, ErrorChainItem, decode_command_results,
};
pub use self::enrollment::Enrollment;
pub use self::errors::DecodeError;
pub use self::request::{EnrollId, EnrollType, Request};
