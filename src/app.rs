//! # App Module
//!
//! View-level flows. Each flow fetches what a screen needs through the
//! [`ApiClient`], keeps the [`SessionStore`] in step with authoritative
//! responses and asks the gate before a claim is offered.
//!
//! An authenticated call answered with 401 means the stored token is invalid
//! or expired, and the session is dropped before the error is returned.

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::error::ClientError;
use crate::gate::{self, ClaimDecision, LockedDealGuidance, VerificationGate};
use crate::models::{Claim, Credentials, Deal, Profile, VerificationStatus};
use crate::session::SessionStore;

pub const CLAIM_SUCCESS_MESSAGE: &str = "Deal claimed successfully! Check your dashboard.";
pub const CLAIM_FAILURE_MESSAGE: &str = "Claim failed";
pub const VERIFICATION_REQUESTED_MESSAGE: &str = "Verification request submitted successfully!";

/// Everything the deal detail screen shows
#[derive(Debug, Clone)]
pub struct DealView {
    pub deal: Deal,
    pub verification_status: Option<VerificationStatus>,
    pub decision: ClaimDecision,
    pub guidance: Option<LockedDealGuidance>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub profile: Option<Profile>,
    pub verification_status: VerificationStatus,
    pub claims: Vec<Claim>,
}

pub struct DealsApp {
    api: ApiClient,
    session: SessionStore,
}

impl DealsApp {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn gate(&self) -> VerificationGate<'_> {
        VerificationGate::new(&self.api, &self.session)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        self.api.register(credentials).await?;
        info!("Registered {}", credentials.email);
        Ok(())
    }

    /// Log in and persist the token with the returned profile
    pub async fn login(&self, credentials: &Credentials) -> Result<Profile, ClientError> {
        let response = self.api.login(credentials).await?;
        let profile = Profile::from(response.user);

        self.session.save(response.token, Some(profile.clone()))?;
        info!("Logged in as {} ({})", profile.email, profile.verification_status);
        Ok(profile)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        Ok(())
    }

    pub async fn deals(&self) -> Result<Vec<Deal>, ClientError> {
        Ok(self.api.list_deals().await?)
    }

    /// Fetch the deal and, when signed in, the verification status
    /// concurrently. A failed status fetch falls back to the cached status;
    /// a failed deal fetch fails the view.
    pub async fn deal_view(&self, deal_id: &str) -> Result<DealView, ClientError> {
        let token = self.session.token();
        let status_fetch = async {
            match token.as_deref() {
                Some(token) => Some(self.api.verification_status(token).await),
                None => None,
            }
        };

        let (deal, status) = futures::join!(self.api.get_deal(deal_id), status_fetch);

        match (token.as_deref(), status) {
            (Some(token), Some(Ok(status))) => {
                self.session.update_verification_for(token, status)?;
            }
            (Some(token), Some(Err(e))) => {
                warn!("Verification status unavailable for deal view: {}", e);
                self.note_auth_failure(token, &e)?;
            }
            _ => {}
        }

        let deal = deal?;
        let verification_status = self.session.verification_status();
        Ok(DealView {
            decision: gate::evaluate(deal.is_locked, verification_status),
            guidance: gate::guidance(&deal, verification_status),
            verification_status,
            deal,
        })
    }

    /// Claims and verification status, fetched concurrently. Both must
    /// succeed.
    pub async fn dashboard(&self) -> Result<Dashboard, ClientError> {
        let token = self.require_token()?;

        let fetched = futures::try_join!(
            self.api.my_claims(&token),
            self.api.verification_status(&token)
        );
        let (claims, verification_status) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                self.note_auth_failure(&token, &e)?;
                return Err(e.into());
            }
        };

        self.session.update_verification_for(&token, verification_status)?;
        let profile = self
            .session
            .current()
            .filter(|s| s.token == token)
            .and_then(|s| s.profile);
        Ok(Dashboard {
            profile,
            verification_status,
            claims,
        })
    }

    pub async fn my_claims(&self) -> Result<Vec<Claim>, ClientError> {
        let token = self.require_token()?;
        let claims = self.api.my_claims(&token).await;
        self.authorized(&token, claims)
    }

    /// Claim a deal. The server re-checks gating and its answer is final.
    pub async fn claim(&self, deal_id: &str) -> Result<Value, ClientError> {
        let token = self.require_token()?;
        let confirmation = self.api.claim_deal(deal_id, &token).await;
        let confirmation = self.authorized(&token, confirmation)?;
        info!("Claimed deal {}", deal_id);
        Ok(confirmation)
    }

    /// Authoritative status fetch; overrides any optimistic value
    pub async fn refresh_verification(&self) -> Result<VerificationStatus, ClientError> {
        let token = self.require_token()?;
        let status = self.api.verification_status(&token).await;
        let status = self.authorized(&token, status)?;
        self.session.update_verification_for(&token, status)?;
        Ok(status)
    }

    pub async fn request_verification(&self) -> Result<Option<VerificationStatus>, ClientError> {
        let token = self.require_token()?;
        match self.gate().request_verification_as(&token).await {
            Err(ClientError::Api(e)) => {
                self.note_auth_failure(&token, &e)?;
                Err(ClientError::Api(e))
            }
            other => other,
        }
    }

    fn require_token(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::NotAuthenticated)
    }

    fn authorized<T>(&self, token: &str, result: Result<T, ApiError>) -> Result<T, ClientError> {
        result.or_else(|e| {
            self.note_auth_failure(token, &e)?;
            Err(e.into())
        })
    }

    /// A 401 only invalidates the session that sent the rejected token
    fn note_auth_failure(&self, token: &str, err: &ApiError) -> Result<(), ClientError> {
        if err.is_unauthorized() && self.session.clear_if(token)? {
            warn!("Server rejected the stored token; signed out");
        }
        Ok(())
    }
}

/// Message shown after a failed claim: the server's own message when it sent
/// one, a generic one otherwise
pub fn claim_failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Api(e) => e
            .payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(CLAIM_FAILURE_MESSAGE)
            .to_string(),
        other => other.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_failure_message_prefers_server_text() {
        let rejected =
            ClientError::from(ApiError::from_response(403, json!({ "message": "Not verified" })));
        assert_eq!(claim_failure_message(&rejected), "Not verified");

        let bare = ClientError::from(ApiError::from_response(500, json!({})));
        assert_eq!(claim_failure_message(&bare), CLAIM_FAILURE_MESSAGE);

        let offline = ClientError::from(ApiError::transport(None));
        assert_eq!(claim_failure_message(&offline), CLAIM_FAILURE_MESSAGE);
    }
}
