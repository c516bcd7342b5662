//! User Models
//!
//! Data structures for authentication requests, responses, and the cached
//! user profile that backs claim gating.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identity-verification tier of a user.
///
/// Ordered `unverified < pending < verified`. Values the server sends that
/// this client does not know decode as `Unrecognized`, which sorts below every
/// known tier and is treated as the most restrictive outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
    #[serde(other)]
    Unrecognized,
}

impl VerificationStatus {
    fn rank(self) -> u8 {
        match self {
            VerificationStatus::Unrecognized => 0,
            VerificationStatus::Unverified => 1,
            VerificationStatus::Pending => 2,
            VerificationStatus::Verified => 3,
        }
    }

    /// Badge text shown next to the profile on the dashboard
    pub fn badge_label(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "✓ Verified",
            VerificationStatus::Pending => "⏳ Verification Pending",
            VerificationStatus::Unverified | VerificationStatus::Unrecognized => "○ Unverified",
        }
    }
}

impl PartialOrd for VerificationStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VerificationStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationStatus::Unrecognized => "unrecognized",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
        };
        f.write_str(s)
    }
}

/// Cached profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(rename = "verificationStatus")]
    pub verification_status: VerificationStatus,
}

impl Profile {
    pub fn new(email: impl Into<String>, verification_status: VerificationStatus) -> Self {
        Self {
            id: None,
            email: email.into(),
            verification_status,
        }
    }
}

/// User record returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "verificationStatus", default = "default_status")]
    pub verification_status: VerificationStatus,
}

fn default_status() -> VerificationStatus {
    VerificationStatus::Unverified
}

impl From<AuthUser> for Profile {
    fn from(user: AuthUser) -> Self {
        Self {
            id: Some(user.id),
            email: user.email,
            verification_status: user.verification_status,
        }
    }
}

/// Register and login request payload
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

/// Token response after successful authentication
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Body of `GET /verification/status`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerificationStatusResponse {
    #[serde(rename = "verificationStatus")]
    pub verification_status: VerificationStatus,
}
