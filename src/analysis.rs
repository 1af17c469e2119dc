//! Reduction of fetched match and mastery data into session analytics.
//!
//! The reducers are pure: they consume an already-ordered slice and return
//! derived aggregates. The caller decides which window to feed them (e.g.
//! the ranked solo/duo matches of the last lookup), which keeps them
//! queue-agnostic.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{MasteryEntry, MatchRecord};

/// Per-game KDA averages over a match window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KdaAverages {
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
}

/// Per-role aggregates over a match window.
#[derive(Debug, Clone, Serialize)]
pub struct RolePerformance {
    pub role: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    /// `(kills + assists) / max(1, deaths)` over this role's totals.
    pub kda_ratio: f64,
}

/// One game's line in the recent-games list.
#[derive(Debug, Clone, Serialize)]
pub struct RecentGame {
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub role: String,
    pub creep_score: i32,
}

/// Aggregates derived from one ordered (most-recent-first) match window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    /// Games in the window.
    pub games: usize,
    pub wins: u32,
    pub losses: u32,
    /// Win percentage over the window, 0 when empty.
    pub win_rate: f64,
    /// Signed length of the run the fold ended on; `None` for an empty
    /// window.
    pub current_streak: Option<i32>,
    /// Longest signed run seen anywhere in the window; `None` when empty.
    pub best_streak: Option<i32>,
    /// Role counts in first-encountered order.
    pub role_histogram: Vec<(String, u32)>,
    /// Argmax of the histogram; ties go to the first-encountered role.
    pub most_played_role: Option<String>,
    /// Win rate and KDA per role, in first-encountered order.
    pub performance_by_role: Vec<RolePerformance>,
    /// The most recent games in the window, newest first.
    pub recent_performance: Vec<RecentGame>,
    pub total_kills: i64,
    pub total_deaths: i64,
    pub total_assists: i64,
    pub avg_kda: KdaAverages,
    /// `(kills + assists) / max(1, deaths)` over the window totals.
    pub kda_ratio: f64,
    /// Mean game length in seconds, 0 when empty.
    pub avg_duration_seconds: f64,
}

impl SessionSummary {
    /// Games carried into [`SessionSummary::recent_performance`].
    const RECENT_GAMES: usize = 5;

    /// Reduce a most-recent-first match window.
    ///
    /// Streaks fold over the records in the order given: the first record
    /// seeds the run, matching outcomes extend it, a flipped outcome resets
    /// it to length one. The best streak is the longest run seen during the
    /// fold, signed by the run that produced it; the current streak is the
    /// run the fold ends on.
    ///
    /// An empty window yields zero-valued aggregates with no role or streak
    /// data.
    pub fn reduce(records: &[MatchRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            games: records.len(),
            ..Self::default()
        };

        let mut current_sign: i32 = 0;
        let mut current_magnitude: i32 = 0;
        let mut best_magnitude: i32 = 0;
        let mut best_sign: i32 = 0;
        let mut total_duration: i64 = 0;

        for record in records {
            if record.win {
                summary.wins += 1;
            } else {
                summary.losses += 1;
            }

            let sign = if record.win { 1 } else { -1 };
            if sign == current_sign {
                current_magnitude += 1;
            } else {
                current_sign = sign;
                current_magnitude = 1;
            }
            if current_magnitude > best_magnitude {
                best_magnitude = current_magnitude;
                best_sign = current_sign;
            }

            if !record.role.is_empty() {
                match summary
                    .role_histogram
                    .iter_mut()
                    .find(|(role, _)| role == &record.role)
                {
                    Some((_, count)) => *count += 1,
                    None => summary.role_histogram.push((record.role.clone(), 1)),
                }

                let slot = match summary
                    .performance_by_role
                    .iter()
                    .position(|perf| perf.role == record.role)
                {
                    Some(slot) => slot,
                    None => {
                        summary.performance_by_role.push(RolePerformance {
                            role: record.role.clone(),
                            games: 0,
                            wins: 0,
                            win_rate: 0.0,
                            kills: 0,
                            deaths: 0,
                            assists: 0,
                            kda_ratio: 0.0,
                        });
                        summary.performance_by_role.len() - 1
                    }
                };
                let perf = &mut summary.performance_by_role[slot];
                perf.games += 1;
                if record.win {
                    perf.wins += 1;
                }
                perf.kills += i64::from(record.kills);
                perf.deaths += i64::from(record.deaths);
                perf.assists += i64::from(record.assists);
            }

            if summary.recent_performance.len() < Self::RECENT_GAMES {
                summary.recent_performance.push(RecentGame {
                    champion_name: record.champion_name.clone(),
                    win: record.win,
                    kills: record.kills,
                    deaths: record.deaths,
                    assists: record.assists,
                    role: record.role.clone(),
                    creep_score: record.creep_score,
                });
            }

            summary.total_kills += i64::from(record.kills);
            summary.total_deaths += i64::from(record.deaths);
            summary.total_assists += i64::from(record.assists);
            total_duration += record.duration_seconds;
        }

        summary.current_streak = Some(current_sign * current_magnitude);
        summary.best_streak = Some(best_sign * best_magnitude);

        // The histogram preserves encounter order; max_by_key keeps the
        // last maximum, so scanning it reversed breaks ties to the
        // first-encountered role.
        summary.most_played_role = summary
            .role_histogram
            .iter()
            .rev()
            .max_by_key(|(_, count)| *count)
            .map(|(role, _)| role.clone());

        for perf in &mut summary.performance_by_role {
            perf.win_rate = f64::from(perf.wins) / f64::from(perf.games) * 100.0;
            perf.kda_ratio = (perf.kills + perf.assists) as f64 / perf.deaths.max(1) as f64;
        }

        let games = summary.games as f64;
        summary.win_rate = f64::from(summary.wins) / games * 100.0;
        summary.avg_kda = KdaAverages {
            kills: summary.total_kills as f64 / games,
            deaths: summary.total_deaths as f64 / games,
            assists: summary.total_assists as f64 / games,
        };
        summary.kda_ratio = (summary.total_kills + summary.total_assists) as f64
            / summary.total_deaths.max(1) as f64;
        summary.avg_duration_seconds = total_duration as f64 / games;

        summary
    }
}

/// Aggregates for one champion over a match window.
#[derive(Debug, Clone, Serialize)]
pub struct ChampionStats {
    pub champion_id: i64,
    pub champion_name: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    /// `(kills + assists) / max(1, deaths)` over this champion's totals.
    pub kda_ratio: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub cs_per_minute: f64,
    pub gold_per_minute: f64,
    pub damage_per_minute: f64,
    pub vision_per_game: f64,
    /// The champion's most common role; ties go to the first-encountered
    /// role.
    pub main_role: Option<String>,
    /// Up to six `(item_id, pick_count)` pairs, most picked first.
    pub core_items: Vec<(i32, u32)>,
}

impl ChampionStats {
    /// Item build rows carried per champion.
    const CORE_ITEM_SLOTS: usize = 6;

    /// Reduce a match window into per-champion aggregates, most played
    /// first. Ties on game count keep the first-encountered champion
    /// ahead.
    ///
    /// Only the six build slots count towards `core_items`; the trinket
    /// slot and empty slots (id 0) are skipped.
    pub fn reduce(records: &[MatchRecord]) -> Vec<Self> {
        struct Acc {
            stats: ChampionStats,
            kills: i64,
            deaths: i64,
            assists: i64,
            creep_score: i64,
            gold: i64,
            damage: i64,
            vision: i64,
            seconds: i64,
            roles: Vec<(String, u32)>,
            items: Vec<(i32, u32)>,
        }

        let mut accs: Vec<Acc> = Vec::new();

        for record in records {
            let slot = match accs
                .iter()
                .position(|acc| acc.stats.champion_id == record.champion_id)
            {
                Some(slot) => slot,
                None => {
                    accs.push(Acc {
                        stats: ChampionStats {
                            champion_id: record.champion_id,
                            champion_name: record.champion_name.clone(),
                            games: 0,
                            wins: 0,
                            win_rate: 0.0,
                            kda_ratio: 0.0,
                            avg_kills: 0.0,
                            avg_deaths: 0.0,
                            avg_assists: 0.0,
                            cs_per_minute: 0.0,
                            gold_per_minute: 0.0,
                            damage_per_minute: 0.0,
                            vision_per_game: 0.0,
                            main_role: None,
                            core_items: Vec::new(),
                        },
                        kills: 0,
                        deaths: 0,
                        assists: 0,
                        creep_score: 0,
                        gold: 0,
                        damage: 0,
                        vision: 0,
                        seconds: 0,
                        roles: Vec::new(),
                        items: Vec::new(),
                    });
                    accs.len() - 1
                }
            };
            let acc = &mut accs[slot];

            acc.stats.games += 1;
            if record.win {
                acc.stats.wins += 1;
            }
            acc.kills += i64::from(record.kills);
            acc.deaths += i64::from(record.deaths);
            acc.assists += i64::from(record.assists);
            acc.creep_score += i64::from(record.creep_score);
            acc.gold += record.gold_earned;
            acc.damage += record.damage_to_champions;
            acc.vision += i64::from(record.vision_score);
            acc.seconds += record.duration_seconds;

            if !record.role.is_empty() {
                match acc.roles.iter_mut().find(|(role, _)| role == &record.role) {
                    Some((_, count)) => *count += 1,
                    None => acc.roles.push((record.role.clone(), 1)),
                }
            }

            for &item in record.item_ids.iter().take(Self::CORE_ITEM_SLOTS) {
                if item == 0 {
                    continue;
                }
                match acc.items.iter_mut().find(|(id, _)| *id == item) {
                    Some((_, count)) => *count += 1,
                    None => acc.items.push((item, 1)),
                }
            }
        }

        accs.sort_by(|a, b| b.stats.games.cmp(&a.stats.games));

        accs.into_iter()
            .map(|mut acc| {
                let games = f64::from(acc.stats.games);
                let minutes = acc.seconds as f64 / 60.0;

                acc.stats.win_rate = f64::from(acc.stats.wins) / games * 100.0;
                acc.stats.kda_ratio =
                    (acc.kills + acc.assists) as f64 / acc.deaths.max(1) as f64;
                acc.stats.avg_kills = acc.kills as f64 / games;
                acc.stats.avg_deaths = acc.deaths as f64 / games;
                acc.stats.avg_assists = acc.assists as f64 / games;
                if acc.seconds > 0 {
                    acc.stats.cs_per_minute = acc.creep_score as f64 / minutes;
                    acc.stats.gold_per_minute = acc.gold as f64 / minutes;
                    acc.stats.damage_per_minute = acc.damage as f64 / minutes;
                }
                acc.stats.vision_per_game = acc.vision as f64 / games;
                acc.stats.main_role = acc
                    .roles
                    .iter()
                    .rev()
                    .max_by_key(|(_, count)| *count)
                    .map(|(role, _)| role.clone());

                acc.items.sort_by(|a, b| b.1.cmp(&a.1));
                acc.items.truncate(Self::CORE_ITEM_SLOTS);
                acc.stats.core_items = acc.items;

                acc.stats
            })
            .collect()
    }
}

/// A champion close to its next mastery level.
#[derive(Debug, Clone, Serialize)]
pub struct MasteryProgress {
    pub champion_id: i64,
    pub level: i32,
    pub points: i64,
    pub points_to_next: i64,
}

/// Aggregates derived from a mastery list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MasterySummary {
    /// Total mastery points across all champions.
    pub total_points: i64,
    /// Champion count per mastery level.
    pub level_histogram: BTreeMap<i32, u32>,
    /// Up to three champions below level 7 and within 10 000 points of
    /// their next level, closest first.
    pub closest_to_next_level: Vec<MasteryProgress>,
    /// The player's top champions by mastery points (provider order).
    pub top_champions: Vec<MasteryEntry>,
}

impl MasterySummary {
    /// Progress is only tracked below this level; level 7 is terminal.
    const MAX_TRACKED_LEVEL: i32 = 7;
    /// A champion further than this from its next level is not "close".
    const PROGRESS_WINDOW: i64 = 10_000;

    /// Reduce a mastery list (provider order, highest points first).
    pub fn reduce(entries: &[MasteryEntry]) -> Self {
        let mut summary = Self::default();

        for entry in entries {
            *summary.level_histogram.entry(entry.champion_level).or_insert(0) += 1;
            summary.total_points += entry.champion_points;

            if entry.champion_level < Self::MAX_TRACKED_LEVEL
                && entry.champion_points_until_next_level > 0
                && entry.champion_points_until_next_level < Self::PROGRESS_WINDOW
            {
                summary.closest_to_next_level.push(MasteryProgress {
                    champion_id: entry.champion_id,
                    level: entry.champion_level,
                    points: entry.champion_points,
                    points_to_next: entry.champion_points_until_next_level,
                });
            }
        }

        summary
            .closest_to_next_level
            .sort_by_key(|progress| progress.points_to_next);
        summary.closest_to_next_level.truncate(3);
        summary.top_champions = entries.iter().take(3).cloned().collect();

        summary
    }
}
