//! Shared primitive IDs and catalog-related enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog record identifier, server- or locally-assigned.
pub type CharacterId = u64;
/// One-based page number of the remote listing.
pub type PageNumber = u32;

/// Life status of a character as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterStatus {
    /// Alive.
    Alive,
    /// Dead.
    Dead,
    /// Unknown; the remote catalog spells this in lowercase.
    #[default]
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl CharacterStatus {
    /// Wire spelling of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loading state of the paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListStatus {
    /// No fetch in flight and the last one succeeded.
    #[default]
    Idle,
    /// A page fetch is in flight.
    Loading,
    /// The last page fetch failed.
    Error,
}

/// Where the store is running, which decides whether durable storage is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    /// Interactive client with a durable key-value store.
    Browser,
    /// Server-side rendering; state lives only for the request.
    Server,
}
