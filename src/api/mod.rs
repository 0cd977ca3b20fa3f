//! Read-only access to the remote character catalog.
//!
//! The remote API has no write endpoints; local edits live in the
//! [`crate::overlay::Overlay`] instead.

pub mod http;

use std::future::Future;

use thiserror::Error;

use crate::character::{Character, PageEnvelope};
use crate::types::{CharacterId, PageNumber};

pub use http::{DEFAULT_BASE_URL, HttpCatalogApi};

/// Failure of a single catalog request. Requests are never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("HTTP {status} {status_text}")]
    Http {
        /// Status code.
        status: u16,
        /// Canonical reason phrase.
        status_text: String,
    },

    /// Connection, TLS, or body transfer failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result alias for catalog requests.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Common interface for catalog backends.
pub trait CatalogApi: Send + Sync + 'static {
    /// Fetch one page of the listing, optionally filtered by name.
    fn list_characters(
        &self,
        page: PageNumber,
        name: &str,
    ) -> impl Future<Output = ApiResult<PageEnvelope>> + Send;

    /// Fetch a single record.
    fn get_character(&self, id: CharacterId)
    -> impl Future<Output = ApiResult<Character>> + Send;
}
