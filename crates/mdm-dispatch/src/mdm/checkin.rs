//! Check-in messages and their decoder.
//!
//! Devices open and close their management session with check-in messages.
//! Every message is a property list dictionary whose `MessageType` key
//! selects one of a closed set of kinds; the remaining keys depend on that
//! kind. The decoder reads the kind first and then decodes the full body into
//! the matching typed message, so an unknown kind is reported as a distinct
//! [`DecodeError::UnrecognizedMessageType`] rather than a malformed body.

use serde::Deserialize;
use strum::{Display, EnumString, IntoStaticStr};

use super::document::Document;
use super::enrollment::Enrollment;
use super::errors::DecodeError;

/// Kinds of check-in message understood by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, IntoStaticStr)]
pub enum MessageType {
    /// Initial enrollment handshake.
    Authenticate,
    /// Push token registration or refresh.
    TokenUpdate,
    /// Device is leaving management.
    CheckOut,
}

impl MessageType {
    /// Every kind the decoder can produce.
    pub const ALL: [Self; 3] = [Self::Authenticate, Self::TokenUpdate, Self::CheckOut];

    /// Returns the protocol name used in the `MessageType` key.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Device identity presented when enrolling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Authenticate {
    /// Identity of the enrolling device or user.
    #[serde(skip)]
    pub enrollment: Enrollment,
    /// Push topic the device will listen on.
    #[serde(rename = "Topic", default)]
    pub topic: String,
    /// Operating system build, e.g. `21E258`.
    #[serde(rename = "BuildVersion", default)]
    pub build_version: Option<String>,
    /// User-assigned device name.
    #[serde(rename = "DeviceName", default)]
    pub device_name: Option<String>,
    /// Cellular modem IMEI, when present.
    #[serde(rename = "IMEI", default)]
    pub imei: Option<String>,
    /// Cellular modem MEID, when present.
    #[serde(rename = "MEID", default)]
    pub meid: Option<String>,
    /// Hardware model identifier.
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    /// Marketing model name.
    #[serde(rename = "ModelName", default)]
    pub model_name: Option<String>,
    /// Operating system version, e.g. `17.4`.
    #[serde(rename = "OSVersion", default)]
    pub os_version: Option<String>,
    /// Product identifier, e.g. `iPhone15,2`.
    #[serde(rename = "ProductName", default)]
    pub product_name: Option<String>,
    /// Hardware serial number.
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<String>,
    /// Undecoded message body.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

/// Push credentials reported by an enrolled device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUpdate {
    /// Identity of the device or user channel.
    #[serde(skip)]
    pub enrollment: Enrollment,
    /// Push topic the token belongs to.
    #[serde(rename = "Topic", default)]
    pub topic: String,
    /// Opaque value echoed back in push notifications.
    #[serde(rename = "PushMagic", default)]
    pub push_magic: String,
    /// Push token for the device.
    #[serde(rename = "Token", with = "serde_bytes", default)]
    pub token: Vec<u8>,
    /// Token used to clear the device passcode, when escrowed.
    #[serde(rename = "UnlockToken", with = "serde_bytes", default)]
    pub unlock_token: Option<Vec<u8>>,
    /// Device is waiting in Setup Assistant for configuration.
    #[serde(rename = "AwaitingConfiguration", default)]
    pub awaiting_configuration: bool,
    /// Undecoded message body.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

/// Notice that a device is no longer managed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckOut {
    /// Identity of the departing device or user.
    #[serde(skip)]
    pub enrollment: Enrollment,
    /// Push topic the device was listening on.
    #[serde(rename = "Topic", default)]
    pub topic: String,
    /// Undecoded message body.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

/// A decoded check-in message. Exactly one variant per decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinMessage {
    /// Enrollment handshake.
    Authenticate(Authenticate),
    /// Push credential update.
    TokenUpdate(TokenUpdate),
    /// Departure from management.
    CheckOut(CheckOut),
}

impl CheckinMessage {
    /// Kind of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Authenticate(_) => MessageType::Authenticate,
            Self::TokenUpdate(_) => MessageType::TokenUpdate,
            Self::CheckOut(_) => MessageType::CheckOut,
        }
    }

    /// Identity fields carried by the message.
    pub fn enrollment(&self) -> &Enrollment {
        match self {
            Self::Authenticate(message) => &message.enrollment,
            Self::TokenUpdate(message) => &message.enrollment,
            Self::CheckOut(message) => &message.enrollment,
        }
    }

    /// Body the message was decoded from.
    pub fn raw(&self) -> &[u8] {
        match self {
            Self::Authenticate(message) => &message.raw,
            Self::TokenUpdate(message) => &message.raw,
            Self::CheckOut(message) => &message.raw,
        }
    }
}

#[derive(Deserialize)]
struct MessageTypeKey {
    #[serde(rename = "MessageType")]
    message_type: Option<String>,
}

/// Decodes a raw check-in body into a typed message.
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] for an empty body,
/// [`DecodeError::Malformed`] when the body is not a property list of the
/// expected shape, [`DecodeError::MissingMessageType`] when the kind is absent
/// and [`DecodeError::UnrecognizedMessageType`] for kinds outside
/// [`MessageType::ALL`].
pub fn decode_checkin(body: &[u8]) -> Result<CheckinMessage, DecodeError> {
    let document = Document::parse(body)?;

    let key: MessageTypeKey = document.view()?;
    let name = key
        .message_type
        .ok_or(DecodeError::MissingMessageType)?;
    let message_type = name
        .parse::<MessageType>()
        .map_err(|_| DecodeError::unrecognized_message_type(name.as_str()))?;
    let enrollment = document.enrollment()?;

    let message = match message_type {
        MessageType::Authenticate => {
            let mut message: Authenticate = document.view()?;
            message.enrollment = enrollment;
            message.raw = body.to_vec();
            CheckinMessage::Authenticate(message)
        }
        MessageType::TokenUpdate => {
            let mut message: TokenUpdate = document.view()?;
            message.enrollment = enrollment;
            message.raw = body.to_vec();
            CheckinMessage::TokenUpdate(message)
        }
        MessageType::CheckOut => {
            let mut message: CheckOut = document.view()?;
            message.enrollment = enrollment;
            message.raw = body.to_vec();
            CheckinMessage::CheckOut(message)
        }
    };
    Ok(message)
}
