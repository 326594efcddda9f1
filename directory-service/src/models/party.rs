//! Party hierarchy reference: System owns Companies, Companies own Clients.
//!
//! This core does not administer parties; it consumes these references to
//! scope records and claims to their owning party.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a party in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyType {
    System,
    Company,
    Client,
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyType::System => write!(f, "SYSTEM"),
            PartyType::Company => write!(f, "COMPANY"),
            PartyType::Client => write!(f, "CLIENT"),
        }
    }
}

/// Reference to a record by its assigned id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Id {
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A party reference together with its parent in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetails {
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}
