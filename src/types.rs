//! Typed Riot API payloads and the records derived from them.
//!
//! Payloads are validated at the ingestion boundary: every response is
//! deserialized into one of these types, and a response missing an expected
//! element (e.g. the requested participant in a match) surfaces as
//! [`RiotError::Malformed`] instead of propagating an untyped gap deeper
//! into the analysis layer.

use serde::{Deserialize, Serialize};

use crate::error::RiotError;

/// Account V1 response (account by Riot ID).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

/// Summoner V4 response (summoner by puuid).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    pub id: String,
    pub puuid: String,
    #[serde(default)]
    pub summoner_level: i64,
    #[serde(default)]
    pub profile_icon_id: i32,
}

/// A resolved player identity.
///
/// Resolved once per lookup from the account and summoner endpoints and
/// immutable thereafter; every downstream call keys off it.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Provider-wide unique player id, stable across name changes.
    pub puuid: String,
    /// Platform-scoped summoner id, used by the ranked endpoint.
    pub summoner_id: String,
    pub game_name: String,
    pub tag_line: String,
    pub summoner_level: i64,
    pub profile_icon_id: i32,
}

impl Identity {
    pub(crate) fn from_parts(account: Account, summoner: Summoner) -> Self {
        Self {
            puuid: summoner.puuid,
            summoner_id: summoner.id,
            game_name: account.game_name,
            tag_line: account.tag_line,
            summoner_level: summoner.summoner_level,
            profile_icon_id: summoner.profile_icon_id,
        }
    }

    /// The display form of the Riot ID, `Name#TAG`.
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

/// League V4 ranked entry, one per queue the player has a rank in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    #[serde(default)]
    pub hot_streak: bool,
}

impl LeagueEntry {
    /// Win rate over all games in this queue, as a percentage.
    pub fn win_rate(&self) -> f64 {
        let total = self.wins + self.losses;
        if total == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(total) * 100.0
        }
    }
}

/// Champion Mastery V4 entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryEntry {
    pub champion_id: i64,
    pub champion_level: i32,
    pub champion_points: i64,
    #[serde(default)]
    pub champion_points_until_next_level: i64,
}

/// Match V5 response.
#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_duration: i64,
    #[serde(default)]
    pub queue_id: u32,
    pub participants: Vec<Participant>,
}

/// One player's slot in a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    pub champion_id: i64,
    #[serde(default)]
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub total_minions_killed: i32,
    #[serde(default)]
    pub neutral_minions_killed: i32,
    #[serde(default)]
    pub gold_earned: i64,
    #[serde(default)]
    pub total_damage_dealt_to_champions: i64,
    #[serde(default)]
    pub vision_score: i32,
    #[serde(default)]
    pub item0: i32,
    #[serde(default)]
    pub item1: i32,
    #[serde(default)]
    pub item2: i32,
    #[serde(default)]
    pub item3: i32,
    #[serde(default)]
    pub item4: i32,
    #[serde(default)]
    pub item5: i32,
    #[serde(default)]
    pub item6: i32,
}

/// One match reduced to the fields the analysis layer consumes, for the
/// single participant matching the looked-up identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub champion_id: i64,
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub role: String,
    pub duration_seconds: i64,
    /// Lane plus jungle minions.
    pub creep_score: i32,
    pub gold_earned: i64,
    pub damage_to_champions: i64,
    pub vision_score: i32,
    /// Item slots 0-6; empty slots are id 0.
    pub item_ids: Vec<i32>,
}

impl MatchRecord {
    /// Extract the record for `puuid` from a full match payload.
    ///
    /// The identity's absence from the participant list is a malformed
    /// response, never a defaulted record.
    pub fn for_participant(m: &Match, puuid: &str) -> Result<Self, RiotError> {
        let p = m
            .info
            .participants
            .iter()
            .find(|p| p.puuid == puuid)
            .ok_or_else(|| {
                RiotError::Malformed(format!(
                    "participant {puuid} not present in match {}",
                    m.metadata.match_id
                ))
            })?;

        Ok(Self {
            champion_id: p.champion_id,
            champion_name: p.champion_name.clone(),
            win: p.win,
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            role: p.team_position.clone(),
            duration_seconds: m.info.game_duration,
            creep_score: p.total_minions_killed + p.neutral_minions_killed,
            gold_earned: p.gold_earned,
            damage_to_champions: p.total_damage_dealt_to_champions,
            vision_score: p.vision_score,
            item_ids: vec![p.item0, p.item1, p.item2, p.item3, p.item4, p.item5, p.item6],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_with_participants(puuids: &[&str]) -> Match {
        let participants = puuids
            .iter()
            .map(|p| Participant {
                puuid: (*p).to_string(),
                champion_id: 1,
                champion_name: "Annie".to_string(),
                win: true,
                kills: 5,
                deaths: 2,
                assists: 9,
                team_position: "MIDDLE".to_string(),
                total_minions_killed: 180,
                neutral_minions_killed: 20,
                gold_earned: 12_000,
                total_damage_dealt_to_champions: 24_000,
                vision_score: 25,
                item0: 1001,
                item1: 0,
                item2: 0,
                item3: 0,
                item4: 0,
                item5: 0,
                item6: 3340,
            })
            .collect();

        Match {
            metadata: MatchMetadata {
                match_id: "NA1_100".to_string(),
                participants: puuids.iter().map(|p| (*p).to_string()).collect(),
            },
            info: MatchInfo {
                game_duration: 1800,
                queue_id: 420,
                participants,
            },
        }
    }

    #[test]
    fn test_record_extracted_for_matching_puuid() {
        let m = match_with_participants(&["a", "b"]);
        let record = MatchRecord::for_participant(&m, "b").unwrap();
        assert_eq!(record.role, "MIDDLE");
        assert_eq!(record.item_ids.len(), 7);
        assert_eq!(record.duration_seconds, 1800);
        assert_eq!(record.creep_score, 200);
        assert_eq!(record.gold_earned, 12_000);
    }

    #[test]
    fn test_missing_participant_is_malformed() {
        let m = match_with_participants(&["a", "b"]);
        let err = MatchRecord::for_participant(&m, "missing").unwrap_err();
        assert!(matches!(err, RiotError::Malformed(_)));
    }

    #[test]
    fn test_league_entry_win_rate() {
        let entry = LeagueEntry {
            queue_type: "RANKED_SOLO_5x5".to_string(),
            tier: "GOLD".to_string(),
            rank: "II".to_string(),
            league_points: 40,
            wins: 30,
            losses: 20,
            hot_streak: false,
        };
        assert!((entry.win_rate() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_account_deserializes_camel_case() {
        let account: Account = serde_json::from_str(
            r#"{"puuid":"p-1","gameName":"Faker","tagLine":"KR1"}"#,
        )
        .unwrap();
        assert_eq!(account.game_name, "Faker");
        assert_eq!(account.tag_line, "KR1");
    }
}
