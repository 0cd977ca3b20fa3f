//! Character record, draft, patch, and page envelope types.

use serde::{Deserialize, Serialize};

use crate::types::{CharacterId, CharacterStatus};

/// Fully materialized catalog record.
///
/// Additional fields sent by the remote catalog are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Life status.
    pub status: CharacterStatus,
    /// Species label.
    pub species: String,
    /// Portrait URL.
    pub image: String,
}

/// Payload used to create a new [`Character`]; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterDraft {
    /// Display name.
    pub name: String,
    /// Life status.
    pub status: CharacterStatus,
    /// Species label.
    pub species: String,
    /// Portrait URL.
    pub image: String,
}

impl CharacterDraft {
    /// Materializes the draft under `id`.
    pub fn into_character(self, id: CharacterId) -> Character {
        Character {
            id,
            name: self.name,
            status: self.status,
            species: self.species,
            image: self.image,
        }
    }
}

/// Sparse patch where each `Some` field overwrites the record value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterPatch {
    /// Optional replacement for the name.
    pub name: Option<String>,
    /// Optional replacement for the status.
    pub status: Option<CharacterStatus>,
    /// Optional replacement for the species.
    pub species: Option<String>,
    /// Optional replacement for the portrait URL.
    pub image: Option<String>,
}

impl CharacterPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `rec`.
    pub fn apply_to(&self, rec: &mut Character) {
        if let Some(v) = &self.name {
            rec.name = v.clone();
        }
        if let Some(v) = self.status {
            rec.status = v;
        }
        if let Some(v) = &self.species {
            rec.species = v.clone();
        }
        if let Some(v) = &self.image {
            rec.image = v.clone();
        }
    }

    /// Returns a copy of `rec` with this patch merged on top.
    pub fn merged(&self, rec: &Character) -> Character {
        let mut out = rec.clone();
        self.apply_to(&mut out);
        out
    }
}

impl From<CharacterDraft> for CharacterPatch {
    fn from(draft: CharacterDraft) -> Self {
        Self {
            name: Some(draft.name),
            status: Some(draft.status),
            species: Some(draft.species),
            image: Some(draft.image),
        }
    }
}

/// Listing metadata returned alongside each page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of matching records.
    pub count: u64,
    /// Total number of pages.
    pub pages: u32,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub prev: Option<String>,
}

/// One page of the remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope {
    /// Listing metadata.
    pub info: PageInfo,
    /// Records on this page, in server order.
    pub results: Vec<Character>,
}
