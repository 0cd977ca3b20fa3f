//! Detail view: local-first record resolution and the delete workflow.

use tracing::debug;

use crate::{
    api::CatalogApi,
    character::Character,
    core::store::CatalogStore,
    routes::Route,
    types::CharacterId,
};

/// What the detail view was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailSource {
    /// Record handed over directly (dialog mode); used verbatim.
    Inline(Character),
    /// Raw `:id` route segment (routed mode).
    Route(String),
}

/// How the detail view is presented, which decides how it is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Dialog over the list.
    Overlay,
    /// Full page at `/characters/:id`.
    Routed,
}

/// Where the detail view goes after closing or deleting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailExit {
    /// Dismiss the dialog.
    CloseOverlay,
    /// Navigate to this route.
    Navigate(Route),
}

/// Result of the synchronous half of detail resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalResolution {
    /// Found inline or in the store.
    Resolved(Character),
    /// The route segment is not an id.
    NotFound,
    /// Not known locally; ask the remote catalog for this id.
    Remote(CharacterId),
}

/// Yes/no gate consulted before destructive actions.
pub trait ConfirmGate {
    /// Asks the user; true means go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmGate for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Gate used where no interactive prompt exists; always confirms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prompt shown before a delete.
pub const DELETE_PROMPT: &str = "Confirm deletion?";

/// Parses a route segment into an id; anything but an unsigned integer is `None`.
pub fn parse_route_id(raw: &str) -> Option<CharacterId> {
    raw.trim().parse().ok()
}

/// Synchronous half of resolution: inline data, then the store.
pub fn resolve_local(store: &CatalogStore, source: DetailSource) -> LocalResolution {
    match source {
        DetailSource::Inline(rec) => LocalResolution::Resolved(rec),
        DetailSource::Route(raw) => match parse_route_id(&raw) {
            None => LocalResolution::NotFound,
            Some(id) => match store.find_by_id(id) {
                Some(rec) => LocalResolution::Resolved(rec),
                None => LocalResolution::Remote(id),
            },
        },
    }
}

/// Fetches a record that was not known locally. Any failure leaves it unresolved.
pub async fn fetch_remote<A: CatalogApi>(api: &A, id: CharacterId) -> Option<Character> {
    match api.get_character(id).await {
        Ok(rec) => Some(rec),
        Err(err) => {
            debug!(id, "detail fetch failed: {err}");
            None
        }
    }
}

/// Full resolution: inline data, then the store, then one remote attempt.
pub async fn resolve_detail<A: CatalogApi>(
    store: &CatalogStore,
    api: &A,
    source: DetailSource,
) -> Option<Character> {
    match resolve_local(store, source) {
        LocalResolution::Resolved(rec) => Some(rec),
        LocalResolution::NotFound => None,
        LocalResolution::Remote(id) => fetch_remote(api, id).await,
    }
}

/// How to leave the detail view after close or delete.
pub fn exit_for(presentation: Presentation) -> DetailExit {
    match presentation {
        Presentation::Overlay => DetailExit::CloseOverlay,
        Presentation::Routed => DetailExit::Navigate(Route::List),
    }
}

/// Asks `gate`; on confirmation returns how to leave the view. `None` means
/// cancelled, and the caller must neither delete nor navigate.
pub fn confirm_delete(gate: &mut impl ConfirmGate, presentation: Presentation) -> Option<DetailExit> {
    gate.confirm(DELETE_PROMPT).then(|| exit_for(presentation))
}

/// Delete workflow against a store owned by the caller.
pub fn remove(
    store: &mut CatalogStore,
    id: CharacterId,
    gate: &mut impl ConfirmGate,
    presentation: Presentation,
) -> Option<DetailExit> {
    let exit = confirm_delete(gate, presentation)?;
    store.delete_local(id);
    Some(exit)
}
