//! Lookup orchestration: one user query fanned out into a bounded,
//! throttled, partial-failure-tolerant set of endpoint calls.
//!
//! Identity resolution is mandatory and terminal on failure. Everything
//! downstream of it is optional enrichment: a failed ranked, mastery or
//! match fetch degrades to an empty default without aborting its siblings.

use futures_util::future::join_all;
use serde::Serialize;

use crate::analysis::{ChampionStats, KdaAverages, SessionSummary};
use crate::client::RiotClient;
use crate::error::RiotError;
use crate::routing::{Platform, Routing};
use crate::types::{Identity, LeagueEntry, MasteryEntry, MatchRecord};

/// How many match ids to request per lookup. The detail fan-out is bounded
/// separately by [`RiotClient::match_detail_limit`].
const MATCH_ID_COUNT: u32 = 20;

/// A ranked queue entry augmented with analytics derived from the recent
/// match window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedOverview {
    #[serde(flatten)]
    pub entry: LeagueEntry,
    /// Best signed streak over the recent window.
    pub streak: i32,
    pub most_played_role: Option<String>,
    #[serde(rename = "avgKDA")]
    pub avg_kda: KdaAverages,
    /// Games the analytics were computed over.
    pub recent_games: usize,
}

/// Everything one lookup produces.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub identity: Identity,
    /// Ranked entries enriched with recent-window analytics; empty if the
    /// ranked endpoint failed or the player is unranked.
    pub ranked: Vec<RankedOverview>,
    /// Champion masteries; empty if the mastery endpoint failed.
    pub masteries: Vec<MasteryEntry>,
    /// Most-recent-first match records, at most
    /// [`RiotClient::match_detail_limit`] of them.
    pub matches: Vec<MatchRecord>,
    /// Session analytics over `matches`.
    pub summary: SessionSummary,
    /// Per-champion analytics over `matches`, most played first.
    pub champion_stats: Vec<ChampionStats>,
}

impl RiotClient {
    /// Aggregate player statistics for one Riot ID.
    ///
    /// 1. Resolve the identity (two sequential calls; failure is terminal
    ///    and no further calls are issued).
    /// 2. Fetch ranked entries, masteries and the match-id list
    ///    concurrently, each in its own rate-limit category; individual
    ///    failures degrade to empty defaults.
    /// 3. Fetch details for the first K match ids concurrently (K =
    ///    [`RiotClient::match_detail_limit`]); a failed or malformed match
    ///    is dropped. Result order follows the id list, never completion
    ///    order.
    /// 4. Reduce the record window and attach the analytics to every
    ///    ranked entry.
    pub async fn aggregate(
        &self,
        game_name: &str,
        tag_line: &str,
        platform: Platform,
    ) -> Result<AggregateResult, RiotError> {
        let identity = self.resolve_identity(platform, game_name, tag_line).await?;
        tracing::info!(riot_id = %identity.riot_id(), %platform, "identity resolved");

        let routing = platform.routing();
        let (ranked, masteries, match_ids) = tokio::join!(
            self.get_ranked_entries(platform, &identity.summoner_id),
            self.get_masteries(platform, &identity.puuid),
            self.get_match_ids(routing, &identity.puuid, None, MATCH_ID_COUNT),
        );

        let ranked = ranked.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ranked fetch failed, continuing without it");
            Vec::new()
        });
        let masteries = masteries.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "mastery fetch failed, continuing without it");
            Vec::new()
        });
        let match_ids = match_ids.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "match-id fetch failed, continuing without it");
            Vec::new()
        });

        let matches = self.fetch_match_window(routing, &identity.puuid, &match_ids).await;
        let summary = SessionSummary::reduce(&matches);
        let champion_stats = ChampionStats::reduce(&matches);

        let ranked = ranked
            .into_iter()
            .map(|entry| RankedOverview {
                entry,
                streak: summary.best_streak.unwrap_or(0),
                most_played_role: summary.most_played_role.clone(),
                avg_kda: summary.avg_kda,
                recent_games: summary.games,
            })
            .collect();

        Ok(AggregateResult {
            identity,
            ranked,
            masteries,
            matches,
            summary,
            champion_stats,
        })
    }

    /// Fetch details for the first K ids and reduce each to a
    /// [`MatchRecord`] for `puuid`.
    ///
    /// The fan-out never exceeds the configured limit even when more ids
    /// are available. Failures are dropped; surviving records keep the
    /// id-list order because results are placed by originating request.
    async fn fetch_match_window(
        &self,
        routing: Routing,
        puuid: &str,
        match_ids: &[String],
    ) -> Vec<MatchRecord> {
        let window = &match_ids[..match_ids.len().min(self.match_detail_limit())];
        tracing::debug!(
            available = match_ids.len(),
            fetching = window.len(),
            "match-detail fan-out"
        );

        let details = join_all(
            window
                .iter()
                .map(|id| async move { self.get_match(routing, id).await }),
        )
        .await;

        details
            .into_iter()
            .zip(window)
            .filter_map(|(result, id)| match result {
                Ok(m) => match MatchRecord::for_participant(&m, puuid) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(match_id = %id, error = %e, "dropping malformed match");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!(match_id = %id, error = %e, "dropping failed match fetch");
                    None
                }
            })
            .collect()
    }
}
