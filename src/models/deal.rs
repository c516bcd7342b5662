//! Deal Models
//!
//! Deals are read-only to the client; a fetched deal is never mutated locally.

use serde::{Deserialize, Serialize};

/// An offer a user may claim, possibly locked behind verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "isLocked", default)]
    pub is_locked: bool,
}
