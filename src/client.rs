//! Riot REST API client implementation.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::auth::ApiToken;
use crate::cache::TieredCache;
use crate::error::RiotError;
use crate::rate_limit::{Category, Throttle};
use crate::routing::{Platform, Routing};
use crate::types::{Account, Identity, LeagueEntry, MasteryEntry, Match, Summoner};

/// Request header carrying the API token.
const TOKEN_HEADER: &str = "X-Riot-Token";

/// The Riot REST API client.
///
/// One client holds the HTTP connection pool, the shared per-category
/// [`Throttle`], and the [`TieredCache`] every payload passes through.
/// All configuration is explicit through the builder; there is no global
/// credential state.
///
/// # Example
///
/// ```rust,no_run
/// use riot_stats_client::client::RiotClient;
/// use riot_stats_client::routing::Platform;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RiotClient::builder()
///         .api_token("RGAPI-...")
///         .build()
///         .await?;
///
///     let result = client.aggregate("Faker", "KR1", Platform::Kr).await?;
///     println!("{} recent games", result.matches.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RiotClient {
    http: ClientWithMiddleware,
    token: ApiToken,
    throttle: Arc<Throttle>,
    cache: Arc<TieredCache>,
    match_detail_limit: usize,
    /// Base-URL overrides, used by tests to point at a mock server.
    platform_base: Option<String>,
    regional_base: Option<String>,
}

impl RiotClient {
    /// Create a new client builder.
    pub fn builder() -> RiotClientBuilder {
        RiotClientBuilder::new()
    }

    /// The shared throttle instance.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// The tiered cache every payload passes through.
    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    /// Upper bound on the match-detail fan-out per lookup.
    pub fn match_detail_limit(&self) -> usize {
        self.match_detail_limit
    }

    fn platform_base(&self, platform: Platform) -> String {
        self.platform_base
            .clone()
            .unwrap_or_else(|| platform.base_url())
    }

    fn regional_base(&self, routing: Routing) -> String {
        self.regional_base
            .clone()
            .unwrap_or_else(|| routing.base_url())
    }

    /// Fetch and decode one endpoint.
    ///
    /// The cache is consulted before the throttle, so a cached payload
    /// costs neither a rate-limit slot nor a network call; on a miss,
    /// exactly one throttled HTTP GET runs and the body is written through
    /// both cache tiers.
    pub(crate) async fn get_json<T>(&self, category: Category, url: &str) -> Result<T, RiotError>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self
            .cache
            .get_or_fetch(url, move || async move {
                self.throttle.wait(category).await;
                tracing::debug!(?category, url, "dispatching request");

                let response = self
                    .http
                    .get(url)
                    .header(TOKEN_HEADER, self.token.expose())
                    .send()
                    .await?;
                let status = response.status();
                let body = response.text().await?;
                if let Some(err) = RiotError::from_status(status, &body) {
                    return Err(err);
                }
                Ok(body.into_bytes())
            })
            .await?;

        serde_json::from_slice(&bytes)
            .map_err(|e| RiotError::Malformed(format!("failed to decode {url}: {e}")))
    }

    /// As [`Self::get_json`], with a serialized query string appended.
    pub(crate) async fn get_json_with_params<T, Q>(
        &self,
        category: Category,
        url: &str,
        params: &Q,
    ) -> Result<T, RiotError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| RiotError::Malformed(e.to_string()))?;
        if query.is_empty() {
            self.get_json(category, url).await
        } else {
            self.get_json(category, &format!("{url}?{query}")).await
        }
    }

    // ========== Endpoints ==========

    /// Account V1: account by Riot ID (regional routing).
    pub async fn get_account_by_riot_id(
        &self,
        routing: Routing,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, RiotError> {
        // Game names may contain spaces and non-ASCII characters, so the
        // path segments go through Url's percent-encoding.
        let mut url = url::Url::parse(&self.regional_base(routing))?;
        url.path_segments_mut()
            .map_err(|()| RiotError::Malformed("base URL cannot be a base".to_string()))?
            .extend(["riot", "account", "v1", "accounts", "by-riot-id"])
            .extend([game_name, tag_line]);
        self.get_json(Category::Account, url.as_str()).await
    }

    /// Summoner V4: summoner by puuid (platform routing).
    pub async fn get_summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Summoner, RiotError> {
        let url = format!(
            "{}/lol/summoner/v4/summoners/by-puuid/{puuid}",
            self.platform_base(platform)
        );
        self.get_json(Category::Summoner, &url).await
    }

    /// League V4: ranked entries by summoner id (platform routing).
    pub async fn get_ranked_entries(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntry>, RiotError> {
        let url = format!(
            "{}/lol/league/v4/entries/by-summoner/{summoner_id}",
            self.platform_base(platform)
        );
        self.get_json(Category::Ranked, &url).await
    }

    /// Champion Mastery V4: masteries by puuid (platform routing).
    pub async fn get_masteries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<MasteryEntry>, RiotError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/champion-masteries/by-puuid/{puuid}",
            self.platform_base(platform)
        );
        self.get_json(Category::Mastery, &url).await
    }

    /// Champion Mastery V4: total mastery score by puuid (platform routing).
    pub async fn get_mastery_score(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<i64, RiotError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/scores/by-puuid/{puuid}",
            self.platform_base(platform)
        );
        self.get_json(Category::Mastery, &url).await
    }

    /// Match V5: match-id list by puuid (regional routing).
    ///
    /// The provider returns ids most-recent-first; callers depend on that
    /// order and must not re-sort.
    pub async fn get_match_ids(
        &self,
        routing: Routing,
        puuid: &str,
        queue: Option<u32>,
        count: u32,
    ) -> Result<Vec<String>, RiotError> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{puuid}/ids",
            self.regional_base(routing)
        );
        let params = MatchIdsQuery { queue, count };
        self.get_json_with_params(Category::MatchIds, &url, &params)
            .await
    }

    /// Match V5: match detail by id (regional routing).
    pub async fn get_match(&self, routing: Routing, match_id: &str) -> Result<Match, RiotError> {
        let url = format!(
            "{}/lol/match/v5/matches/{match_id}",
            self.regional_base(routing)
        );
        self.get_json(Category::MatchDetail, &url).await
    }

    /// Resolve a Riot ID into an [`Identity`].
    ///
    /// Two sequential calls: account by Riot ID on the continental host,
    /// then summoner by puuid on the platform host. Any failure here is
    /// terminal for the lookup; there is no way to continue without the
    /// puuid and summoner id.
    pub async fn resolve_identity(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Identity, RiotError> {
        let account = self
            .get_account_by_riot_id(platform.routing(), game_name, tag_line)
            .await?;
        let summoner = self
            .get_summoner_by_puuid(platform, &account.puuid)
            .await?;
        Ok(Identity::from_parts(account, summoner))
    }
}

impl std::fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotClient")
            .field("token", &self.token)
            .field("match_detail_limit", &self.match_detail_limit)
            .field("cache_dir", &self.cache.dir())
            .finish()
    }
}

#[derive(serde::Serialize)]
struct MatchIdsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    queue: Option<u32>,
    count: u32,
}

/// Builder for [`RiotClient`].
pub struct RiotClientBuilder {
    api_token: Option<ApiToken>,
    requests_per_second: u32,
    match_detail_limit: usize,
    cache_dir: PathBuf,
    user_agent: Option<String>,
    platform_base: Option<String>,
    regional_base: Option<String>,
}

impl RiotClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_token: None,
            requests_per_second: 20,
            match_detail_limit: 10,
            cache_dir: PathBuf::from("cache"),
            user_agent: None,
            platform_base: None,
            regional_base: None,
        }
    }

    /// Set the API token (required).
    pub fn api_token(mut self, token: impl Into<ApiToken>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Requests per second allowed per rate-limit category (default 20).
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = rps;
        self
    }

    /// Maximum match-detail fetches per lookup (default 10).
    pub fn match_detail_limit(mut self, limit: usize) -> Self {
        self.match_detail_limit = limit;
        self
    }

    /// Directory for the disk cache tier (default `cache`).
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the platform-routed base URL (useful for testing with a
    /// mock server).
    pub fn platform_base_url(mut self, url: impl Into<String>) -> Self {
        self.platform_base = Some(url.into());
        self
    }

    /// Override the regionally-routed base URL (useful for testing with a
    /// mock server).
    pub fn regional_base_url(mut self, url: impl Into<String>) -> Self {
        self.regional_base = Some(url.into());
        self
    }

    /// Build the client.
    ///
    /// Fails with [`RiotError::MissingApiKey`] if no token was supplied --
    /// a configuration fault, distinct from runtime fetch faults.
    pub async fn build(self) -> Result<RiotClient, RiotError> {
        let token = self.api_token.ok_or(RiotError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("riot-stats-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("riot-stats-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let http = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let cache = TieredCache::open(self.cache_dir).await?;

        Ok(RiotClient {
            http,
            token,
            throttle: Arc::new(Throttle::new(self.requests_per_second)),
            cache: Arc::new(cache),
            match_detail_limit: self.match_detail_limit.max(1),
            platform_base: self.platform_base,
            regional_base: self.regional_base,
        })
    }
}

impl Default for RiotClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
