//! # API Module
//!
//! Request/response plumbing for the remote deals service.
//!
//! - `client`: the `get`/`post` primitives and response normalization
//! - `endpoints`: one typed method per remote endpoint
//! - `error`: the `ApiError` every failure is converted into

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiErrorKind};
