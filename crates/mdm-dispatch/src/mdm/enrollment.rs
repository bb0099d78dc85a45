//! Identity keys common to every check-in message and command report.

use serde::Deserialize;

/// Identity keys shared by check-in messages and command reports.
///
/// Device channel messages carry `UDID` (or `EnrollmentID` for user
/// enrollments); user channel messages add the user keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Enrollment {
    /// Hardware identifier of a device enrollment.
    #[serde(rename = "UDID", default)]
    pub udid: Option<String>,
    /// Directory identifier of the managed user.
    #[serde(rename = "UserID", default)]
    pub user_id: Option<String>,
    /// Short login name of the managed user.
    #[serde(rename = "UserShortName", default)]
    pub user_short_name: Option<String>,
    /// Full name of the managed user.
    #[serde(rename = "UserLongName", default)]
    pub user_long_name: Option<String>,
    /// Anonymous identifier of a user enrollment device channel.
    #[serde(rename = "EnrollmentID", default)]
    pub enrollment_id: Option<String>,
    /// Anonymous identifier of a user enrollment user channel.
    #[serde(rename = "EnrollmentUserID", default)]
    pub enrollment_user_id: Option<String>,
}

impl Enrollment {
    /// Returns `true` when the message arrived on a user channel.
    pub fn is_user_channel(&self) -> bool {
        self.user_id.is_some() || self.enrollment_user_id.is_some()
    }
}
