//! Verification Gate
//!
//! Decides whether a claim on a deal is currently permitted and what the claim
//! affordance should say. The decision is a pure function of the deal's lock
//! flag and the caller's verification status:
//!
//! | locked | status              | eligible | label                   |
//! |--------|---------------------|----------|-------------------------|
//! | no     | any, or none        | yes      | "Claim"                 |
//! | yes    | verified            | yes      | "Claim"                 |
//! | yes    | pending             | no       | "Verification Pending"  |
//! | yes    | unverified, or none | no       | "Verification Required" |
//!
//! This gate is advisory. The server re-checks every claim and may still
//! reject one the gate allowed.

use std::fmt;

use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{Deal, VerificationStatus};
use crate::session::SessionStore;

/// Text on the claim button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimLabel {
    Claim,
    VerificationPending,
    VerificationRequired,
}

impl ClaimLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimLabel::Claim => "Claim",
            ClaimLabel::VerificationPending => "Verification Pending",
            ClaimLabel::VerificationRequired => "Verification Required",
        }
    }
}

impl fmt::Display for ClaimLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance shown above the claim button on locked deals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedDealGuidance {
    Verified,
    AwaitingReview,
    VerificationRequired,
}

impl LockedDealGuidance {
    pub fn message(self) -> &'static str {
        match self {
            LockedDealGuidance::Verified => "You're verified and can claim this exclusive deal!",
            LockedDealGuidance::AwaitingReview => concat!(
                "Your verification is pending review. ",
                "You'll be able to claim this deal once your verification is approved."
            ),
            LockedDealGuidance::VerificationRequired => concat!(
                "This is an exclusive deal available only to verified users. ",
                "Get verified to unlock premium benefits and locked deals."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimDecision {
    pub eligible: bool,
    pub label: ClaimLabel,
}

/// Evaluate the decision table. Total over every input, including statuses
/// this client does not recognise, which fall to the most restrictive row.
pub fn evaluate(is_locked: bool, status: Option<VerificationStatus>) -> ClaimDecision {
    let label = match (is_locked, status) {
        (false, _) => ClaimLabel::Claim,
        (true, Some(VerificationStatus::Verified)) => ClaimLabel::Claim,
        (true, Some(VerificationStatus::Pending)) => ClaimLabel::VerificationPending,
        (true, Some(VerificationStatus::Unverified | VerificationStatus::Unrecognized) | None) => {
            ClaimLabel::VerificationRequired
        }
    };

    ClaimDecision {
        eligible: label == ClaimLabel::Claim,
        label,
    }
}

pub fn can_claim(deal: &Deal, status: Option<VerificationStatus>) -> bool {
    evaluate(deal.is_locked, status).eligible
}

pub fn claim_label(deal: &Deal, status: Option<VerificationStatus>) -> ClaimLabel {
    evaluate(deal.is_locked, status).label
}

/// `None` for unlocked deals
pub fn guidance(deal: &Deal, status: Option<VerificationStatus>) -> Option<LockedDealGuidance> {
    if !deal.is_locked {
        return None;
    }
    Some(match status {
        Some(VerificationStatus::Verified) => LockedDealGuidance::Verified,
        Some(VerificationStatus::Pending) => LockedDealGuidance::AwaitingReview,
        _ => LockedDealGuidance::VerificationRequired,
    })
}

/// The gate's only network operation: asking for verification
pub struct VerificationGate<'a> {
    api: &'a ApiClient,
    session: &'a SessionStore,
}

impl<'a> VerificationGate<'a> {
    pub fn new(api: &'a ApiClient, session: &'a SessionStore) -> Self {
        Self { api, session }
    }

    /// Claim decision for `deal` against the cached status
    pub fn decide(&self, deal: &Deal) -> ClaimDecision {
        evaluate(deal.is_locked, self.session.verification_status())
    }

    /// Ask the server to start verification. On success the cached status
    /// moves from unverified to pending until the next status fetch confirms
    /// or overrides it; on failure the cache is untouched and the `ApiError`
    /// is returned as is.
    pub async fn request_verification(&self) -> Result<Option<VerificationStatus>, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        self.request_verification_as(&token).await
    }

    /// Request verification with `token`. The optimistic update only lands if
    /// `token` is still the signed-in session when the server answers.
    pub async fn request_verification_as(
        &self,
        token: &str,
    ) -> Result<Option<VerificationStatus>, ClientError> {
        self.api.request_verification(token).await?;

        if self.session.mark_verification_requested(token)? {
            info!("Verification requested; cached status is pending until confirmed");
        }
        Ok(self.session.verification_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [Option<VerificationStatus>; 5] = [
        None,
        Some(VerificationStatus::Unrecognized),
        Some(VerificationStatus::Unverified),
        Some(VerificationStatus::Pending),
        Some(VerificationStatus::Verified),
    ];

    fn deal(is_locked: bool) -> Deal {
        Deal {
            id: "42".to_string(),
            title: "Half off".to_string(),
            description: "50% off the annual plan".to_string(),
            category: "software".to_string(),
            is_locked,
        }
    }

    #[test]
    fn test_unlocked_deals_are_always_claimable() {
        for status in ALL_STATUSES {
            assert!(can_claim(&deal(false), status), "status {:?}", status);
            assert_eq!(claim_label(&deal(false), status), ClaimLabel::Claim);
            assert_eq!(guidance(&deal(false), status), None);
        }
    }

    #[test]
    fn test_locked_deals_need_exactly_verified() {
        for status in ALL_STATUSES {
            let expected = status == Some(VerificationStatus::Verified);
            assert_eq!(can_claim(&deal(true), status), expected, "status {:?}", status);
        }
    }

    #[test]
    fn test_locked_labels() {
        let locked = deal(true);
        assert_eq!(
            claim_label(&locked, Some(VerificationStatus::Verified)).to_string(),
            "Claim"
        );
        assert_eq!(
            claim_label(&locked, Some(VerificationStatus::Pending)).to_string(),
            "Verification Pending"
        );
        assert_eq!(
            claim_label(&locked, Some(VerificationStatus::Unverified)).to_string(),
            "Verification Required"
        );
        assert_eq!(claim_label(&locked, None), ClaimLabel::VerificationRequired);
        assert_eq!(
            claim_label(&locked, Some(VerificationStatus::Unrecognized)),
            ClaimLabel::VerificationRequired
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        for status in ALL_STATUSES {
            for locked in [false, true] {
                assert_eq!(evaluate(locked, status), evaluate(locked, status));
            }
        }
    }

    #[test]
    fn test_guidance_for_locked_deals() {
        let locked = deal(true);
        assert_eq!(
            guidance(&locked, Some(VerificationStatus::Verified)),
            Some(LockedDealGuidance::Verified)
        );
        assert_eq!(
            guidance(&locked, Some(VerificationStatus::Pending)),
            Some(LockedDealGuidance::AwaitingReview)
        );
        assert_eq!(guidance(&locked, None), Some(LockedDealGuidance::VerificationRequired));
    }

    #[tokio::test]
    async fn test_request_without_session_sends_nothing() {
        // nothing listens here; a request would surface as a transport error
        let url = url::Url::parse("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(&url, None).unwrap();
        let session = SessionStore::in_memory();

        let err = VerificationGate::new(&api, &session)
            .request_verification()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }
}
