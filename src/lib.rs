//! # Riot Stats Client
//!
//! An async Rust client library for aggregating player statistics from the
//! Riot Games API.
//!
//! ## Features
//!
//! - One lookup fans out to ranked, mastery, match-history and per-match
//!   detail endpoints, bounded and concurrently
//! - Built-in per-category rate limiting
//! - Partial-failure tolerance: optional enrichment degrades gracefully,
//!   identity resolution does not
//! - Session analytics over the recent match window (streaks, roles, KDA)
//! - Tiered memory + disk response cache with explicit age-based eviction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riot_stats_client::client::RiotClient;
//! use riot_stats_client::routing::Platform;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RiotClient::builder()
//!         .api_token("RGAPI-...")
//!         .build()
//!         .await?;
//!
//!     let result = client.aggregate("Faker", "KR1", Platform::Kr).await?;
//!     println!(
//!         "{}: {} ranked queues, current streak {:?}",
//!         result.identity.riot_id(),
//!         result.ranked.len(),
//!         result.summary.current_streak,
//!     );
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod analysis;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod rate_limit;
pub mod recent;
pub mod routing;
pub mod static_data;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::{AggregateResult, RankedOverview};
pub use client::RiotClient;
pub use error::RiotError;
pub use routing::{Platform, Routing};

/// Result type alias using RiotError
pub type Result<T> = std::result::Result<T, RiotError>;
