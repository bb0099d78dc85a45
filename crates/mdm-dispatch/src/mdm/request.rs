//! Request context handed to services alongside each decoded message.

use std::collections::BTreeMap;

use strum::{Display, EnumString};

/// Kind of enrollment a request was authenticated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "PascalCase")]
pub enum EnrollType {
    /// Device channel of a device enrollment.
    Device,
    /// User channel of a device enrollment.
    User,
    /// Device channel of a user enrollment.
    UserEnrollmentDevice,
    /// User channel of a user enrollment.
    UserEnrollment,
}

/// Resolved enrollment identity of the requesting channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollId {
    /// Enrollment kind.
    pub kind: EnrollType,
    /// Channel identifier (device UDID or a user channel id).
    pub id: String,
    /// Device channel that owns a user channel, if any.
    pub parent_id: Option<String>,
}

impl EnrollId {
    /// Creates an identity without a parent channel.
    pub fn new(kind: EnrollType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            parent_id: None,
        }
    }

    /// Sets the owning device channel.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Identity and protocol metadata established before dispatch.
///
/// The transport layer builds one request per HTTP exchange; dispatchers and
/// services only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    enroll_id: Option<EnrollId>,
    certificate: Option<Vec<u8>>,
    params: BTreeMap<String, String>,
}

impl Request {
    /// Creates an empty request context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the resolved enrollment identity.
    #[must_use]
    pub fn with_enroll_id(mut self, enroll_id: EnrollId) -> Self {
        self.enroll_id = Some(enroll_id);
        self
    }

    /// Attaches the DER-encoded client certificate.
    #[must_use]
    pub fn with_certificate(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.certificate = Some(der.into());
        self
    }

    /// Adds a transport parameter (for example a URL query value).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Enrollment identity, when resolved.
    pub fn enroll_id(&self) -> Option<&EnrollId> {
        self.enroll_id.as_ref()
    }

    /// DER-encoded client certificate, when presented.
    pub fn certificate(&self) -> Option<&[u8]> {
        self.certificate.as_deref()
    }

    /// Looks up a transport parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
