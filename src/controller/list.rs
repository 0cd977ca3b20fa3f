//! Pagination state machine: reset on query change, append on scroll.
//!
//! Fetching is split into `begin_*` (synchronous cursor transitions that yield
//! a [`PageRequest`]) and [`ListController::complete`] (merge the response).
//! The caller runs the request in between, which keeps every store mutation on
//! the owning task while several requests may be in flight.

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    api::ApiResult,
    character::{Character, PageEnvelope},
    core::store::CatalogStore,
    types::{CharacterId, ListStatus, PageNumber},
};

/// How a fetched page is merged into the live list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Discard accumulated pages.
    Replace,
    /// Append and dedupe.
    Append,
}

/// One page fetch issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Reload generation the request belongs to.
    pub generation: u64,
    /// Page to fetch.
    pub page: PageNumber,
    /// Name filter at issue time.
    pub query: String,
    /// How the response is merged.
    pub mode: FetchMode,
}

/// Result of merging a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page 1 replaced the live list.
    Replaced {
        /// Records on the page.
        len: usize,
    },
    /// A later page was appended.
    Appended {
        /// Net records added after dedupe.
        added: usize,
    },
    /// The request failed; status is `Error`.
    Failed,
    /// A newer reload started after this request was issued; nothing changed.
    Stale,
}

/// Issues page requests and merges their responses into the store.
#[derive(Debug, Default)]
pub struct ListController {
    generation: u64,
}

impl ListController {
    /// Controller at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reload generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resets to page 1 and starts a new generation.
    pub fn begin_reload(&mut self, store: &mut CatalogStore) -> PageRequest {
        self.generation += 1;
        store.set_page(1);
        store.set_loading();
        PageRequest {
            generation: self.generation,
            page: 1,
            query: store.cursor().query().to_string(),
            mode: FetchMode::Replace,
        }
    }

    /// Advances to the next page unless a fetch is in flight or the last
    /// page has been reached; in that case nothing changes.
    pub fn begin_load_more(&mut self, store: &mut CatalogStore) -> Option<PageRequest> {
        let cursor = store.cursor();
        if !cursor.has_more() || cursor.status() == ListStatus::Loading {
            return None;
        }
        let page = cursor.page() + 1;
        store.set_page(page);
        store.set_loading();
        Some(PageRequest {
            generation: self.generation,
            page,
            query: store.cursor().query().to_string(),
            mode: FetchMode::Append,
        })
    }

    /// Merges a finished request. Responses from an older generation are dropped.
    pub fn complete(
        &mut self,
        store: &mut CatalogStore,
        request: &PageRequest,
        result: ApiResult<PageEnvelope>,
    ) -> FetchOutcome {
        if request.generation != self.generation {
            debug!(
                page = request.page,
                generation = request.generation,
                current = self.generation,
                "dropping stale page"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(envelope) => {
                store.hydrate_from_api(&envelope);
                match request.mode {
                    FetchMode::Replace => {
                        let len = envelope.results.len();
                        store.replace_characters(envelope.results);
                        FetchOutcome::Replaced { len }
                    }
                    FetchMode::Append => {
                        let before = store.characters().len();
                        let mut merged = store.characters().to_vec();
                        merged.extend(envelope.results);
                        let merged = dedupe_by_id(merged);
                        let added = merged.len().saturating_sub(before);
                        store.replace_characters(merged);
                        FetchOutcome::Appended { added }
                    }
                }
            }
            Err(err) => {
                debug!(page = request.page, "page fetch failed: {err}");
                store.set_error();
                if request.mode == FetchMode::Append {
                    store.set_page(request.page.saturating_sub(1));
                }
                FetchOutcome::Failed
            }
        }
    }
}

/// Keeps the first position of each id and the content of its last occurrence.
pub fn dedupe_by_id(items: Vec<Character>) -> Vec<Character> {
    let mut pos: HashMap<CharacterId, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<Character> = Vec::with_capacity(items.len());
    for item in items {
        match pos.get(&item.id) {
            Some(&idx) => out[idx] = item,
            None => {
                pos.insert(item.id, out.len());
                out.push(item);
            }
        }
    }
    out
}

/// Viewport proximity margin used by [`is_near_end`], in pixels.
pub const NEAR_END_MARGIN_PX: f64 = 200.0;

/// True when a sentinel whose top edge is at `sentinel_top` is within
/// [`NEAR_END_MARGIN_PX`] of a viewport `viewport_height` tall.
pub fn is_near_end(sentinel_top: f64, viewport_height: f64) -> bool {
    sentinel_top <= viewport_height + NEAR_END_MARGIN_PX
}
