use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::{
    character::{Character, CharacterDraft, CharacterPatch, PageEnvelope},
    overlay::Overlay,
    persist::KeyValueStorage,
    types::{CharacterId, ExecutionContext, ListStatus, PageNumber},
};

use super::cursor::ListCursor;

/// Fixed durable key holding the serialized overlay.
pub const OVERLAY_STORAGE_KEY: &str = "rm-crud-characters-overrides";

/// Authoritative state behind the catalog views.
///
/// Owns the live list (everything fetched so far, pre-overlay), the overlay map,
/// the pagination cursor, and the current selection. Overlay changes are written
/// to durable storage when one is attached; write failures are logged and dropped.
#[derive(Default)]
pub struct CatalogStore {
    characters: Vec<Character>,
    overlay: Overlay,
    cursor: ListCursor,
    selected: Option<Character>,
    storage: Option<Box<dyn KeyValueStorage>>,
    storage_key: String,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("characters", &self.characters.len())
            .field("overlay", &self.overlay.len())
            .field("cursor", &self.cursor)
            .field("selected", &self.selected.as_ref().map(|c| c.id))
            .field("durable", &self.storage.is_some())
            .finish()
    }
}

impl CatalogStore {
    /// Pure in-memory store; never touches durable storage.
    pub fn new() -> Self {
        Self {
            storage_key: OVERLAY_STORAGE_KEY.to_string(),
            ..Self::default()
        }
    }

    /// Store backed by `storage` under [`OVERLAY_STORAGE_KEY`].
    ///
    /// In [`ExecutionContext::Server`] the storage is dropped unread.
    pub fn with_storage(context: ExecutionContext, storage: impl KeyValueStorage + 'static) -> Self {
        Self::with_storage_key(context, storage, OVERLAY_STORAGE_KEY)
    }

    /// Like [`CatalogStore::with_storage`] with an explicit key.
    pub fn with_storage_key(
        context: ExecutionContext,
        storage: impl KeyValueStorage + 'static,
        key: impl Into<String>,
    ) -> Self {
        let mut store = Self {
            storage_key: key.into(),
            ..Self::default()
        };
        if context == ExecutionContext::Server {
            return store;
        }

        match storage.get_item(&store.storage_key) {
            Ok(Some(raw)) => match Overlay::from_json(&raw) {
                Ok(overlay) => {
                    debug!(entries = overlay.len(), "loaded stored overlay");
                    store.overlay = overlay;
                }
                Err(err) => warn!("ignoring unparseable stored overlay: {err}"),
            },
            Ok(None) => {}
            Err(err) => warn!("could not read stored overlay: {err}"),
        }
        store.storage = Some(Box::new(storage));
        store
    }

    /// Returns true when overlay changes are written to durable storage.
    pub fn is_durable(&self) -> bool {
        self.storage.is_some()
    }

    /// Live list as fetched, before the overlay is applied.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Local overlay of edits and deletions.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Pagination cursor.
    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    /// Currently selected record.
    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    /// Live list with the overlay applied and deleted ids dropped.
    pub fn filtered(&self) -> Vec<Character> {
        self.characters
            .iter()
            .filter_map(|c| self.overlay.apply(c))
            .collect()
    }

    /// Live list first, overlay-only entries second.
    pub fn find_by_id(&self, id: CharacterId) -> Option<Character> {
        match self.characters.iter().find(|c| c.id == id) {
            Some(c) => self.overlay.apply(c),
            None => self.overlay.lookup(id),
        }
    }

    /// Creates a record under a fresh id and puts it at the head of the live list.
    pub fn create_local(&mut self, draft: CharacterDraft) -> Character {
        let id = self.next_id();
        let created = draft.into_character(id);
        self.overlay.put(created.clone());
        self.characters.insert(0, created.clone());
        self.persist_overlay();
        created
    }

    /// Returns the merged record, or `None` without touching state when `id`
    /// does not resolve.
    pub fn update_local(&mut self, id: CharacterId, patch: &CharacterPatch) -> Option<Character> {
        let current = self.find_by_id(id)?;
        let updated = patch.merged(&current);

        self.overlay.put(updated.clone());
        for c in self.characters.iter_mut().filter(|c| c.id == id) {
            *c = updated.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = Some(updated.clone());
        }
        self.persist_overlay();
        Some(updated)
    }

    /// Tombstones `id`, drops it from the live list, and clears a matching selection.
    pub fn delete_local(&mut self, id: CharacterId) {
        self.overlay.tombstone(id);
        self.characters.retain(|c| c.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        self.persist_overlay();
    }

    /// Applies page totals and settles the status. The page's records are
    /// left for the caller to merge.
    pub fn hydrate_from_api(&mut self, envelope: &PageEnvelope) {
        self.cursor.set_total_pages(envelope.info.pages);
        self.cursor.set_status(ListStatus::Idle);
    }

    /// Replaces the live list wholesale.
    pub fn replace_characters(&mut self, characters: Vec<Character>) {
        self.characters = characters;
    }

    /// Marks a fetch in flight.
    pub fn set_loading(&mut self) {
        self.cursor.set_status(ListStatus::Loading);
    }

    /// Marks the last fetch as failed.
    pub fn set_error(&mut self) {
        self.cursor.set_status(ListStatus::Error);
    }

    /// Moves the cursor, clamped into `1..=total_pages`.
    pub fn set_page(&mut self, page: PageNumber) {
        self.cursor.set_page(page);
    }

    /// Replaces the name filter.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.cursor.set_query(query.into());
    }

    /// Sets or clears the selection.
    pub fn select(&mut self, character: Option<Character>) {
        self.selected = character;
    }

    /// One past the largest known id. Once `CharacterId::MAX` is taken the
    /// smallest unused id is handed out instead.
    fn next_id(&self) -> CharacterId {
        let live_max = self.characters.iter().map(|c| c.id).max();
        let max = live_max.max(self.overlay.max_id()).unwrap_or(0);
        if let Some(next) = max.checked_add(1) {
            return next;
        }

        let taken: HashSet<CharacterId> = self
            .characters
            .iter()
            .map(|c| c.id)
            .chain(self.overlay.ids())
            .collect();
        let reused = (1..=CharacterId::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(0);
        warn!(id = reused, "id space exhausted, reusing lowest free id");
        reused
    }

    fn persist_overlay(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let raw = match self.overlay.to_json() {
            Ok(raw) => raw,
            Err(err) => {
                warn!("could not serialize overlay: {err}");
                return;
            }
        };
        if let Err(err) = storage.set_item(&self.storage_key, &raw) {
            warn!(key = %self.storage_key, "overlay not persisted: {err}");
        }
    }
}

