//! Local create/update/delete overlay layered on top of fetched records.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::{character::Character, types::CharacterId};

/// Serialized overlay shape: id (stringified by JSON) to record, `null` for deletions.
pub type OverlaySnapshot = BTreeMap<CharacterId, Option<Character>>;

/// One overlay entry for a given id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEntry {
    /// Locally created or edited record; replaces any fetched copy.
    Record(Character),
    /// Explicit delete marker; suppresses the id regardless of fetched data.
    Tombstone,
}

impl OverlayEntry {
    /// The record carried by a create/update entry.
    pub fn record(&self) -> Option<&Character> {
        match self {
            OverlayEntry::Record(rec) => Some(rec),
            OverlayEntry::Tombstone => None,
        }
    }
}

/// Record-level patch map keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    entries: HashMap<CharacterId, OverlayEntry>,
}

impl Overlay {
    /// Empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `id`, if any.
    pub fn get(&self, id: CharacterId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    /// Writes a create/update entry, replacing whatever was there.
    pub fn put(&mut self, rec: Character) {
        self.entries.insert(rec.id, OverlayEntry::Record(rec));
    }

    /// Writes a tombstone for `id`.
    pub fn tombstone(&mut self, id: CharacterId) {
        self.entries.insert(id, OverlayEntry::Tombstone);
    }

    /// Returns true when `id` is marked deleted.
    pub fn is_tombstoned(&self, id: CharacterId) -> bool {
        matches!(self.entries.get(&id), Some(OverlayEntry::Tombstone))
    }

    /// Resolves a fetched record through the overlay.
    ///
    /// Tombstone yields `None`, an entry replaces the record, and an absent
    /// entry leaves it as-is.
    pub fn apply(&self, rec: &Character) -> Option<Character> {
        match self.entries.get(&rec.id) {
            Some(OverlayEntry::Tombstone) => None,
            Some(OverlayEntry::Record(over)) => Some(over.clone()),
            None => Some(rec.clone()),
        }
    }

    /// Resolves an id that is not in the live list.
    pub fn lookup(&self, id: CharacterId) -> Option<Character> {
        match self.entries.get(&id) {
            Some(OverlayEntry::Record(rec)) => Some(rec.clone()),
            Some(OverlayEntry::Tombstone) | None => None,
        }
    }

    /// Largest id mentioned by any entry, tombstones included.
    pub fn max_id(&self) -> Option<CharacterId> {
        self.entries.keys().copied().max()
    }

    /// Ids with an entry, tombstones included.
    pub fn ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exports entries in id order.
    pub fn to_snapshot(&self) -> OverlaySnapshot {
        self.entries
            .iter()
            .map(|(id, entry)| {
                let value = match entry {
                    OverlayEntry::Record(rec) => Some(rec.clone()),
                    OverlayEntry::Tombstone => None,
                };
                (*id, value)
            })
            .collect()
    }

    /// Rebuilds an overlay from a snapshot.
    pub fn from_snapshot(snapshot: OverlaySnapshot) -> Self {
        let entries = snapshot
            .into_iter()
            .map(|(id, value)| {
                let entry = match value {
                    Some(rec) => OverlayEntry::Record(rec),
                    None => OverlayEntry::Tombstone,
                };
                (id, entry)
            })
            .collect();
        Self { entries }
    }

    /// Serializes to the durable JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_snapshot())
    }

    /// Parses the durable JSON form.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let snapshot: OverlaySnapshot = serde_json::from_str(raw)?;
        Ok(Self::from_snapshot(snapshot))
    }
}
