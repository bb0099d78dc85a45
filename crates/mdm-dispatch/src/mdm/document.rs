//! Property list bodies parsed once and read through several typed views.
//!
//! Check-in messages and reports share their identity keys with the
//! message-specific keys in one flat dictionary. Each view is decoded as its
//! own struct over the same parsed value, which keeps optional keys in the
//! plain form devices send them in.

use std::io::Cursor;

use plist::Value;
use serde::de::DeserializeOwned;

use super::enrollment::Enrollment;
use super::errors::DecodeError;

/// A parsed property list whose root is a dictionary.
#[derive(Debug, Clone)]
pub(super) struct Document {
    root: Value,
}

impl Document {
    /// Parses an XML or binary property list body.
    pub(super) fn parse(body: &[u8]) -> Result<Self, DecodeError> {
        if body.is_empty() {
            return Err(DecodeError::Empty);
        }
        let root = Value::from_reader(Cursor::new(body)).map_err(DecodeError::from_plist_error)?;
        if root.as_dictionary().is_none() {
            return Err(DecodeError::malformed("root value is not a dictionary"));
        }
        Ok(Self { root })
    }

    /// Decodes the dictionary into `T`, ignoring keys `T` does not name.
    pub(super) fn view<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        plist::from_value(&self.root).map_err(DecodeError::from_plist_error)
    }

    /// Identity keys carried by the dictionary.
    pub(super) fn enrollment(&self) -> Result<Enrollment, DecodeError> {
        self.view()
    }
}
