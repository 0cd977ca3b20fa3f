//! Paginated character catalog with a persisted local overlay of edits.
//!
//! Remote records come from a read-only catalog API. Local creates, edits and
//! deletes live in an overlay that takes precedence over remote data and
//! survives restarts through a [`persist::KeyValueStorage`].
//!
//! # Examples
//!
//! In-memory usage with [`core::store::CatalogStore`]:
//! ```
//! use catalog_overlay::{
//!     character::{CharacterDraft, CharacterPatch},
//!     core::store::CatalogStore,
//!     types::CharacterStatus,
//! };
//!
//! let mut store = CatalogStore::new();
//! let created = store.create_local(CharacterDraft {
//!     name: "Morty".to_string(),
//!     status: CharacterStatus::Alive,
//!     species: "Human".to_string(),
//!     image: "morty.png".to_string(),
//! });
//! assert_eq!(created.id, 1);
//!
//! let patch = CharacterPatch { name: Some("Evil Morty".to_string()), ..Default::default() };
//! store.update_local(created.id, &patch);
//! assert_eq!(store.find_by_id(1).map(|c| c.name), Some("Evil Morty".to_string()));
//!
//! store.delete_local(1);
//! assert!(store.filtered().is_empty());
//! ```
//!
//! Runtime usage with the HTTP client and SQLite-backed overlay:
//! ```no_run
//! use std::sync::Arc;
//!
//! use catalog_overlay::{
//!     api::HttpCatalogApi,
//!     core::store::CatalogStore,
//!     persist::sqlite::SqliteStorage,
//!     runtime::handle::{spawn_catalog, RuntimeConfig},
//!     types::ExecutionContext,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let storage = SqliteStorage::open("catalog.db").expect("open sqlite");
//! let store = CatalogStore::with_storage(ExecutionContext::Browser, storage);
//! let handle = spawn_catalog(store, Arc::new(HttpCatalogApi::default()), RuntimeConfig::default());
//! handle.search("rick").await.expect("search");
//! let _visible = handle.filtered().await.expect("filtered");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Remote catalog client.
pub mod api;
/// Character records, drafts, patches and page envelopes.
pub mod character;
/// List, detail and form controllers.
pub mod controller;
/// Core store and pagination cursor.
pub mod core;
/// Local overlay of edits and deletions.
pub mod overlay;
/// Key-value persistence abstraction with memory and SQLite backends.
pub mod persist;
/// Navigation routes.
pub mod routes;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
