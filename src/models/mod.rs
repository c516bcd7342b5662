//! # Models Module
//!
//! Wire and session data structures shared by the API client, the session
//! store and the verification gate.

pub mod claim;
pub mod deal;
pub mod user;

pub use claim::{Claim, ClaimStatus, ClaimedDeal};
pub use deal::Deal;
pub use user::{
    AuthUser, Credentials, LoginResponse, Profile, VerificationStatus, VerificationStatusResponse,
};
