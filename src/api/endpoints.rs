//! Typed wrappers for the remote service's endpoints.

use serde_json::{Value, json};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::{
    Claim, Credentials, Deal, LoginResponse, VerificationStatus, VerificationStatusResponse,
};

impl ApiClient {
    /// `POST /auth/register`
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let _: Value = self.post("/auth/register", Some(credentials), None).await?;
        Ok(())
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", Some(credentials), None).await
    }

    /// `GET /deals`
    pub async fn list_deals(&self) -> Result<Vec<Deal>, ApiError> {
        self.get("/deals", None).await
    }

    /// `GET /deals/{id}`, with `deal_id` encoded as one path segment
    pub async fn get_deal(&self, deal_id: &str) -> Result<Deal, ApiError> {
        self.get_at(&["deals", deal_id], None).await
    }

    /// `GET /claims/me`
    pub async fn my_claims(&self, token: &str) -> Result<Vec<Claim>, ApiError> {
        self.get("/claims/me", Some(token)).await
    }

    /// `POST /claims/{dealId}`. The server is the authority on gating and may
    /// reject a claim the local gate allowed.
    pub async fn claim_deal(&self, deal_id: &str, token: &str) -> Result<Value, ApiError> {
        self.post_at(&["claims", deal_id], Some(&json!({})), Some(token)).await
    }

    /// `GET /verification/status`
    pub async fn verification_status(&self, token: &str) -> Result<VerificationStatus, ApiError> {
        let response: VerificationStatusResponse =
            self.get("/verification/status", Some(token)).await?;
        Ok(response.verification_status)
    }

    /// `POST /verification/request-verification`
    pub async fn request_verification(&self, token: &str) -> Result<Value, ApiError> {
        self.post("/verification/request-verification", Some(&json!({})), Some(token))
            .await
    }
}
