//! Data Dragon static-data lookups.
//!
//! Data Dragon serves unauthenticated, unthrottled static catalogs (game
//! versions, champions, items) and image assets. Payloads still pass
//! through the [`TieredCache`] so repeated lookups cost one network call.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use crate::cache::TieredCache;
use crate::error::RiotError;

/// Base URL for the Data Dragon CDN.
pub const DDRAGON_BASE_URL: &str = "https://ddragon.leagueoflegends.com";

/// Version used when the version catalog cannot be fetched.
const FALLBACK_VERSION: &str = "13.24.1";

/// Kinds of image assets Data Dragon serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Champion,
    Item,
    ProfileIcon,
}

impl AssetKind {
    fn path(&self) -> &'static str {
        match self {
            AssetKind::Champion => "champion",
            AssetKind::Item => "item",
            AssetKind::ProfileIcon => "profileicon",
        }
    }
}

/// Client for Data Dragon static data.
pub struct DataDragon {
    http: ClientWithMiddleware,
    cache: Arc<TieredCache>,
    base_url: String,
}

impl DataDragon {
    /// Create a client sharing an existing cache.
    pub fn new(cache: Arc<TieredCache>) -> Self {
        Self::with_base_url(cache, DDRAGON_BASE_URL)
    }

    /// Create a client against a custom base URL (useful for testing with
    /// a mock server).
    pub fn with_base_url(cache: Arc<TieredCache>, base_url: impl Into<String>) -> Self {
        let http = ClientBuilder::new(reqwest::Client::new())
            .with(TracingMiddleware::default())
            .build();
        Self {
            http,
            cache,
            base_url: base_url.into(),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Arc<Vec<u8>>, RiotError> {
        self.cache
            .get_or_fetch(url, move || async move {
                let response = self.http.get(url).send().await?;
                let status = response.status();
                let body = response.text().await?;
                if let Some(err) = RiotError::from_status(status, &body) {
                    return Err(err);
                }
                Ok(body.into_bytes())
            })
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RiotError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RiotError::Malformed(format!("failed to decode {url}: {e}")))
    }

    /// The latest game version.
    ///
    /// Data Dragon lists versions newest-first; any failure falls back to a
    /// hardcoded known-good version rather than erroring, because every
    /// asset URL needs some version to render with.
    pub async fn latest_version(&self) -> String {
        let url = format!("{}/api/versions.json", self.base_url);
        match self.get_json::<Vec<String>>(&url).await {
            Ok(versions) => versions
                .into_iter()
                .next()
                .unwrap_or_else(|| FALLBACK_VERSION.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "version lookup failed, using fallback");
                FALLBACK_VERSION.to_string()
            }
        }
    }

    /// Champion id -> name mapping for the given version.
    pub async fn champion_map(&self, version: &str) -> Result<HashMap<String, String>, RiotError> {
        let url = format!(
            "{}/cdn/{version}/data/en_US/champion.json",
            self.base_url
        );
        let catalog: ChampionCatalog = self.get_json(&url).await?;
        Ok(catalog
            .data
            .into_iter()
            .map(|(name, champion)| (champion.key, name))
            .collect())
    }

    /// The raw item catalog for the given version.
    pub async fn item_catalog(&self, version: &str) -> Result<serde_json::Value, RiotError> {
        let url = format!("{}/cdn/{version}/data/en_US/item.json", self.base_url);
        self.get_json(&url).await
    }

    /// URL of an image asset.
    pub fn asset_url(&self, version: &str, kind: AssetKind, name: &str) -> String {
        format!(
            "{}/cdn/{version}/img/{}/{name}.png",
            self.base_url,
            kind.path()
        )
    }
}

impl std::fmt::Debug for DataDragon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataDragon")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Deserialize)]
struct ChampionCatalog {
    data: HashMap<String, ChampionData>,
}

#[derive(Deserialize)]
struct ChampionData {
    /// Numeric champion id, serialized by the provider as a string.
    key: String,
}
