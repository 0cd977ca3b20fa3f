//! reqwest-backed catalog client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::character::{Character, PageEnvelope};
use crate::types::{CharacterId, PageNumber};

use super::{ApiError, ApiResult, CatalogApi};

/// Public Rick and Morty API root.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// HTTP implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

impl Default for HttpCatalogApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpCatalogApi {
    /// Client with a fresh reqwest [`Client`] against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Client reusing `client`. Trailing slashes on `base_url` are dropped.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// API root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/character/?page=N`, plus `&name=` only for a non-empty filter.
    pub fn list_url(&self, page: PageNumber, name: &str) -> String {
        let mut url = format!("{}/character/?page={}", self.base_url, page);
        if !name.is_empty() {
            url.push_str("&name=");
            url.push_str(&urlencoding::encode(name));
        }
        url
    }

    /// `{base}/character/{id}`
    pub fn character_url(&self, id: CharacterId) -> String {
        format!("{}/character/{}", self.base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        debug!(%url, "catalog request");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl CatalogApi for HttpCatalogApi {
    async fn list_characters(&self, page: PageNumber, name: &str) -> ApiResult<PageEnvelope> {
        self.get_json(self.list_url(page, name)).await
    }

    async fn get_character(&self, id: CharacterId) -> ApiResult<Character> {
        self.get_json(self.character_url(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_url_omits_empty_name() {
        let api = HttpCatalogApi::new("https://example.test/api/");
        assert_eq!(api.list_url(1, ""), "https://example.test/api/character/?page=1");
    }

    #[test]
    fn list_url_percent_encodes_name() {
        let api = HttpCatalogApi::new("https://example.test/api");
        assert_eq!(
            api.list_url(2, "rick & morty"),
            "https://example.test/api/character/?page=2&name=rick%20%26%20morty"
        );
    }

    #[test]
    fn character_url_uses_id_segment() {
        let api = HttpCatalogApi::default();
        assert_eq!(
            api.character_url(42),
            "https://rickandmortyapi.com/api/character/42"
        );
    }
}
