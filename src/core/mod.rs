//! In-memory authoritative store and cursor state.

/// Pagination cursor.
pub mod cursor;
/// Overlay store owning the live list, overlay map, and cursor.
pub mod store;
