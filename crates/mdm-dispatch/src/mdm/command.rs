//! Command result reports and queued commands.
//!
//! After check-in a device polls the server with a report describing the
//! outcome of the last command it ran (or `Idle` when it has nothing to
//! report). The server answers with the next command's raw property list, or
//! an empty body when the queue is drained.

use serde::Deserialize;
use strum::EnumString;

use super::document::Document;
use super::enrollment::Enrollment;
use super::errors::DecodeError;

/// Outcome reported for a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, EnumString)]
#[serde(from = "String")]
pub enum CommandStatus {
    /// Command ran successfully.
    Acknowledged,
    /// Command ran and failed; see the error chain.
    Error,
    /// Command could not be parsed by the device.
    CommandFormatError,
    /// Device has no result to report and is asking for work.
    Idle,
    /// Device cannot run the command right now and will retry later.
    NotNow,
    /// Status value this server does not know, preserved verbatim.
    #[strum(default)]
    Unknown(String),
}

impl From<String> for CommandStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| Self::Unknown(value))
    }
}

/// One entry of the error chain attached to failed commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorChainItem {
    /// Numeric code within the domain.
    #[serde(rename = "ErrorCode", default)]
    pub error_code: i64,
    /// Error domain, e.g. `MCMDMErrorDomain`.
    #[serde(rename = "ErrorDomain", default)]
    pub error_domain: String,
    /// Description in the device's language.
    #[serde(rename = "LocalizedDescription", default)]
    pub localized_description: String,
    /// English description, when the device sends one.
    #[serde(rename = "USEnglishDescription", default)]
    pub us_english_description: Option<String>,
}

/// A device's report on a previously issued command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandResults {
    /// Identity of the reporting channel.
    #[serde(skip)]
    pub enrollment: Enrollment,
    /// Command the report refers to; absent for `Idle` reports.
    #[serde(rename = "CommandUUID", default)]
    pub command_uuid: Option<String>,
    /// Outcome of the command, or `Idle`.
    #[serde(rename = "Status")]
    pub status: CommandStatus,
    /// Errors reported for a failed command, outermost first.
    #[serde(rename = "ErrorChain", default)]
    pub error_chain: Vec<ErrorChainItem>,
    /// Undecoded report body.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

impl CommandResults {
    /// Returns `true` when the device is only asking for the next command.
    pub fn is_idle(&self) -> bool {
        self.status == CommandStatus::Idle
    }
}

/// Decodes a raw command result report.
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] for an empty body and
/// [`DecodeError::Malformed`] when the body is not a property list or lacks
/// the `Status` key.
pub fn decode_command_results(body: &[u8]) -> Result<CommandResults, DecodeError> {
    let document = Document::parse(body)?;
    let mut results: CommandResults = document.view()?;
    results.enrollment = document.enrollment()?;
    results.raw = body.to_vec();
    Ok(results)
}

#[derive(Deserialize)]
struct CommandEnvelope {
    #[serde(rename = "CommandUUID")]
    command_uuid: String,
    #[serde(rename = "Command")]
    command: CommandPayload,
}

#[derive(Deserialize)]
struct CommandPayload {
    #[serde(rename = "RequestType")]
    request_type: String,
}

/// A command selected for delivery to a device.
///
/// Only the identifying fields are decoded; the raw property list is what the
/// device receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    command_uuid: String,
    request_type: String,
    raw: Vec<u8>,
}

impl Command {
    /// Creates a command from already-known identifiers and its encoded form.
    pub fn new(
        command_uuid: impl Into<String>,
        request_type: impl Into<String>,
        raw: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            command_uuid: command_uuid.into(),
            request_type: request_type.into(),
            raw: raw.into(),
        }
    }

    /// Decodes the identifying fields of an encoded command.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Empty`] for an empty body and
    /// [`DecodeError::Malformed`] when `CommandUUID` or
    /// `Command.RequestType` is missing.
    pub fn from_raw(raw: impl Into<Vec<u8>>) -> Result<Self, DecodeError> {
        let raw = raw.into();
        let envelope: CommandEnvelope = Document::parse(&raw)?.view()?;
        Ok(Self {
            command_uuid: envelope.command_uuid,
            request_type: envelope.command.request_type,
            raw,
        })
    }

    /// Identifier the device echoes back in its report.
    pub fn command_uuid(&self) -> &str {
        &self.command_uuid
    }

    /// Protocol name of the command, e.g. `DeviceInformation`.
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Encoded command as delivered to the device.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Consumes the command, returning its encoded form.
    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }
}
