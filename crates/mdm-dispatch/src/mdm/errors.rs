//! Error types for property list decoding.

use thiserror::Error;

/// Errors raised while decoding check-in messages, command reports and
/// commands.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body contained no bytes at all.
    #[error("empty message body")]
    Empty,

    /// The body is not a property list matching the expected structure.
    #[error("malformed property list: {message}")]
    Malformed {
        /// Description of the structural problem.
        message: String,
        /// Parser error, when the `plist` crate raised one.
        #[source]
        source: Option<plist::Error>,
    },

    /// A check-in body lacked the `MessageType` key.
    #[error("missing message type")]
    MissingMessageType,

    /// The `MessageType` key named a kind this server does not handle.
    #[error("unrecognized message type: {message_type}")]
    UnrecognizedMessageType {
        /// Value of the `MessageType` key as sent.
        message_type: String,
    },
}

impl DecodeError {
    /// Creates a malformed error from a `plist` error.
    pub fn from_plist_error(source: plist::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unrecognized message type error.
    pub fn unrecognized_message_type(message_type: impl Into<String>) -> Self {
        Self::UnrecognizedMessageType {
            message_type: message_type.into(),
        }
    }

    /// Returns `true` for the unrecognized message type sentinel.
    pub fn is_unrecognized_message_type(&self) -> bool {
        matches!(self, Self::UnrecognizedMessageType { .. })
    }
}
