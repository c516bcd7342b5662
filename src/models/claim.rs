//! Claim Models
//!
//! Claims are created server-side by a claim request; the client only displays them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval state of a claim, independent of the user's verification tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimStatus::Pending => write!(f, "pending"),
            ClaimStatus::Approved => write!(f, "approved"),
        }
    }
}

/// The subset of deal fields embedded in a claim listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedDeal {
    pub title: String,
    #[serde(default)]
    pub category: String,
}

/// A user's record of having taken a deal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub status: ClaimStatus,
    pub deal: ClaimedDeal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_listing_entry() {
        let claim: Claim = serde_json::from_value(json!({
            "_id": "c1",
            "status": "approved",
            "deal": { "title": "Half off", "category": "software" }
        }))
        .unwrap();

        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.deal.title, "Half off");
        assert_eq!(claim.status.to_string(), "approved");
    }

    #[test]
    fn test_unknown_claim_status_is_rejected() {
        let result = serde_json::from_value::<Claim>(json!({
            "_id": "c1",
            "status": "revoked",
            "deal": { "title": "Half off" }
        }));
        assert!(result.is_err());
    }
}
