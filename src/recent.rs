//! Bounded recent-searches list persisted as a small JSON file.
//!
//! Most-recent-first; re-searching an existing name moves it to the front
//! instead of duplicating it. Load errors degrade to an empty list so a
//! corrupt file never blocks a lookup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::RiotError;
use crate::routing::Platform;

/// One remembered search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub riot_id: String,
    pub platform: String,
    #[serde(with = "time::serde::rfc3339")]
    pub searched_at: OffsetDateTime,
}

/// A bounded, file-backed list of recent searches.
#[derive(Debug)]
pub struct RecentSearches {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<SearchEntry>,
}

impl RecentSearches {
    /// Default bound on the list length.
    pub const DEFAULT_MAX: usize = 5;

    /// Load the list from `path`, or start empty if the file is missing or
    /// unreadable.
    pub fn load(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "recent searches file unreadable, starting empty");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        Self {
            path,
            max_entries: max_entries.max(1),
            entries,
        }
    }

    /// Record a search, moving an existing entry for the same Riot ID and
    /// platform to the front, and persist the list.
    pub fn add(&mut self, riot_id: &str, platform: Platform) -> Result<(), RiotError> {
        let platform = platform.to_string();
        self.entries
            .retain(|e| !(e.riot_id == riot_id && e.platform == platform));
        self.entries.insert(
            0,
            SearchEntry {
                riot_id: riot_id.to_string(),
                platform,
                searched_at: OffsetDateTime::now_utc(),
            },
        );
        self.entries.truncate(self.max_entries);
        self.save()
    }

    /// The remembered searches, most recent first.
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Forget every search and persist the empty list.
    pub fn clear(&mut self) -> Result<(), RiotError> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<(), RiotError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(&self.entries)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_in(dir: &tempfile::TempDir) -> RecentSearches {
        RecentSearches::load(dir.path().join("recent.json"), 3)
    }

    #[test]
    fn test_add_keeps_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut searches = list_in(&dir);

        searches.add("Faker#KR1", Platform::Kr).unwrap();
        searches.add("Chovy#KR1", Platform::Kr).unwrap();

        let ids: Vec<&str> = searches.entries().iter().map(|e| e.riot_id.as_str()).collect();
        assert_eq!(ids, vec!["Chovy#KR1", "Faker#KR1"]);
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut searches = list_in(&dir);

        searches.add("Faker#KR1", Platform::Kr).unwrap();
        searches.add("Chovy#KR1", Platform::Kr).unwrap();
        searches.add("Faker#KR1", Platform::Kr).unwrap();

        let ids: Vec<&str> = searches.entries().iter().map(|e| e.riot_id.as_str()).collect();
        assert_eq!(ids, vec!["Faker#KR1", "Chovy#KR1"]);
    }

    #[test]
    fn test_list_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut searches = list_in(&dir);

        for name in ["a#NA1", "b#NA1", "c#NA1", "d#NA1"] {
            searches.add(name, Platform::Na1).unwrap();
        }

        assert_eq!(searches.entries().len(), 3);
        assert_eq!(searches.entries()[0].riot_id, "d#NA1");
    }

    #[test]
    fn test_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut searches = list_in(&dir);
            searches.add("Faker#KR1", Platform::Kr).unwrap();
        }

        let searches = list_in(&dir);
        assert_eq!(searches.entries().len(), 1);
        assert_eq!(searches.entries()[0].platform, "kr");
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        std::fs::write(&path, b"not json").unwrap();

        let searches = RecentSearches::load(&path, 3);
        assert!(searches.entries().is_empty());
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut searches = list_in(&dir);
        searches.add("Faker#KR1", Platform::Kr).unwrap();
        searches.clear().unwrap();
        assert!(searches.entries().is_empty());

        let reloaded = list_in(&dir);
        assert!(reloaded.entries().is_empty());
    }
}
