//! Region routing for Riot API endpoints.
//!
//! Riot uses a two-level routing scheme. Each game server cluster has a
//! *platform* code (`na1`, `euw1`, ...) whose host serves the
//! summoner/ranked/mastery endpoints. Every platform also maps to a
//! *continental routing value* (`americas`, `europe`, `asia`, `sea`) whose
//! host serves the account and match-history endpoints.

use std::fmt;
use std::str::FromStr;

use crate::error::RiotError;

/// A game server platform (per-cluster endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Br1,
    Eun1,
    Euw1,
    Jp1,
    Kr,
    La1,
    La2,
    Na1,
    Oc1,
    Tr1,
    Ru,
}

/// A continental routing value (account and match endpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routing {
    Americas,
    Europe,
    Asia,
    Sea,
}

/// All selectable platforms, in display order.
pub const PLATFORMS: &[Platform] = &[
    Platform::Br1,
    Platform::Eun1,
    Platform::Euw1,
    Platform::Jp1,
    Platform::Kr,
    Platform::La1,
    Platform::La2,
    Platform::Na1,
    Platform::Oc1,
    Platform::Tr1,
    Platform::Ru,
];

impl Platform {
    /// The platform identifier as it appears in API hostnames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Br1 => "br1",
            Platform::Eun1 => "eun1",
            Platform::Euw1 => "euw1",
            Platform::Jp1 => "jp1",
            Platform::Kr => "kr",
            Platform::La1 => "la1",
            Platform::La2 => "la2",
            Platform::Na1 => "na1",
            Platform::Oc1 => "oc1",
            Platform::Tr1 => "tr1",
            Platform::Ru => "ru",
        }
    }

    /// The continental routing value for this platform.
    pub fn routing(&self) -> Routing {
        match self {
            Platform::Br1 | Platform::La1 | Platform::La2 | Platform::Na1 => Routing::Americas,
            Platform::Eun1 | Platform::Euw1 | Platform::Tr1 | Platform::Ru => Routing::Europe,
            Platform::Jp1 | Platform::Kr => Routing::Asia,
            Platform::Oc1 => Routing::Sea,
        }
    }

    /// Base URL for platform-routed endpoints (summoner, ranked, mastery).
    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }
}

impl Routing {
    /// The routing value as it appears in API hostnames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Routing::Americas => "americas",
            Routing::Europe => "europe",
            Routing::Asia => "asia",
            Routing::Sea => "sea",
        }
    }

    /// Base URL for regionally-routed endpoints (account, match history).
    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RiotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "br1" | "br" => Ok(Platform::Br1),
            "eun1" | "eune" => Ok(Platform::Eun1),
            "euw1" | "euw" => Ok(Platform::Euw1),
            "jp1" | "jp" => Ok(Platform::Jp1),
            "kr" => Ok(Platform::Kr),
            "la1" | "lan" => Ok(Platform::La1),
            "la2" | "las" => Ok(Platform::La2),
            "na1" | "na" => Ok(Platform::Na1),
            "oc1" | "oce" => Ok(Platform::Oc1),
            "tr1" | "tr" => Ok(Platform::Tr1),
            "ru" => Ok(Platform::Ru),
            other => Err(RiotError::Malformed(format!("unknown platform: {other}"))),
        }
    }
}

/// Queue identifier for ranked solo/duo, used to filter match-id requests.
pub const QUEUE_RANKED_SOLO: u32 = 420;

/// Human-readable names for the queue types the API reports.
pub fn queue_display_name(queue_type: &str) -> &str {
    match queue_type {
        "RANKED_SOLO_5x5" => "Ranked Solo/Duo",
        "RANKED_FLEX_SR" => "Ranked Flex",
        "NORMAL_DRAFT_5x5" => "Normal Draft",
        "NORMAL_BLIND_5x5" => "Normal Blind",
        "ARAM" => "ARAM",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_routing_table() {
        assert_eq!(Platform::Na1.routing(), Routing::Americas);
        assert_eq!(Platform::Br1.routing(), Routing::Americas);
        assert_eq!(Platform::Euw1.routing(), Routing::Europe);
        assert_eq!(Platform::Ru.routing(), Routing::Europe);
        assert_eq!(Platform::Kr.routing(), Routing::Asia);
        // Oceania routes through sea, not americas.
        assert_eq!(Platform::Oc1.routing(), Routing::Sea);
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(Platform::Na1.base_url(), "https://na1.api.riotgames.com");
        assert_eq!(
            Routing::Americas.base_url(),
            "https://americas.api.riotgames.com"
        );
    }

    #[test]
    fn test_platform_from_str_accepts_aliases() {
        assert_eq!("NA".parse::<Platform>().unwrap(), Platform::Na1);
        assert_eq!("euw1".parse::<Platform>().unwrap(), Platform::Euw1);
        assert_eq!("lan".parse::<Platform>().unwrap(), Platform::La1);
        assert_eq!("las".parse::<Platform>().unwrap(), Platform::La2);
        assert!("xx9".parse::<Platform>().is_err());
    }

    #[test]
    fn test_queue_display_name_falls_back_to_raw() {
        assert_eq!(queue_display_name("RANKED_SOLO_5x5"), "Ranked Solo/Duo");
        assert_eq!(queue_display_name("CHERRY"), "CHERRY");
    }
}
