//! Rate limiting for the Riot API.
//!
//! Riot throttles each endpoint family independently, so the client keeps
//! one bucket per [`Category`] and enforces a minimum interval between calls
//! within a bucket. One [`Throttle`] instance is shared by every fetch in a
//! fan-out; waiting in one category never delays another.
//!
//! # Example
//!
//! ```rust,no_run
//! use riot_stats_client::rate_limit::{Category, Throttle};
//!
//! # async fn example() {
//! let throttle = Throttle::new(20);
//!
//! // Calls in the same category are spaced at least 50ms apart.
//! throttle.wait(Category::MatchDetail).await;
//! throttle.wait(Category::MatchDetail).await;
//! # }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Rate-limit bucket, one per endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Account lookup by Riot ID.
    Account,
    /// Summoner lookup by puuid.
    Summoner,
    /// Ranked league entries.
    Ranked,
    /// Champion masteries.
    Mastery,
    /// Match-id list by puuid.
    MatchIds,
    /// Match detail by match id.
    MatchDetail,
}

/// Per-category minimum-interval gate.
///
/// `wait` reserves the next free slot for its category under a mutex, then
/// sleeps outside the lock until that slot arrives. Reserving before
/// sleeping makes the read-decide-update sequence atomic: two concurrent
/// waiters can never both claim the same interval, and N queued waiters in
/// one category come out spaced by at least the minimum interval.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    /// Next permitted call time per category.
    slots: Mutex<HashMap<Category, Instant>>,
}

impl Throttle {
    /// Create a throttle allowing `requests_per_second` calls per category.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = requests_per_second.max(1);
        Self {
            min_interval: Duration::from_secs(1) / rps,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The enforced spacing between calls within one category.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend until a call in `category` is permitted, then record it.
    ///
    /// This is a pure scheduling primitive: it never fails, it only delays.
    pub async fn wait(&self, category: Category) {
        let slot = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let slot = slots.get(&category).map_or(now, |next| (*next).max(now));
            slots.insert(category, slot + self.min_interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        // Riot development keys allow 20 requests per second.
        Self::new(20)
    }
}
