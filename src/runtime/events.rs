//! Runtime event stream payloads.

use crate::types::{CharacterId, PageNumber};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A page fetch was issued.
    FetchStarted {
        /// Requested page.
        page: PageNumber,
    },
    /// Page 1 replaced the live list.
    ListReplaced {
        /// Records on the page.
        len: usize,
    },
    /// A later page was appended to the live list.
    PageAppended {
        /// Appended page.
        page: PageNumber,
        /// Net records added after dedupe.
        added: usize,
    },
    /// A page fetch failed; the list status is now `Error`.
    FetchFailed {
        /// Page that failed.
        page: PageNumber,
    },
    /// A superseded fetch completed and was ignored.
    StaleDropped {
        /// Page of the ignored response.
        page: PageNumber,
    },
    /// The search input settled on a new query.
    QuerySettled {
        /// Settled query text.
        query: String,
    },
    /// A record was created locally.
    Created {
        /// New record id.
        id: CharacterId,
    },
    /// A record was edited locally.
    Updated {
        /// Edited record id.
        id: CharacterId,
    },
    /// A record was deleted locally.
    Deleted {
        /// Deleted record id.
        id: CharacterId,
    },
}
