//! # Deals Client
//!
//! Client core for a deals service: browse deals, authenticate, and claim
//! deals, some of which are locked behind identity verification.
//!
//! ## Architecture
//! - `session`: persists the bearer token and cached profile
//! - `api`: authenticated JSON calls, every failure normalized to `ApiError`
//! - `gate`: decides whether a claim is currently permitted and how to label it
//! - `app`: screen-level flows composing the three
//! - `config`: environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use app::DealsApp;
pub use error::{ClientError, SessionError};
pub use session::{Session, SessionStore};
