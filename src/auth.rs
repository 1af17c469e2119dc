//! API token handling for Riot API authentication.
//!
//! Riot authenticates every call with a single static token sent in the
//! `X-Riot-Token` header. The token is held in a [`SecretString`] so it is
//! never printed by `Debug` formatting or accidental logging.

use secrecy::{ExposeSecret, SecretString};

/// A Riot API token.
///
/// The token is supplied to [`RiotClient`](crate::client::RiotClient) at
/// construction time; there is no ambient global credential state.
#[derive(Clone)]
pub struct ApiToken {
    token: SecretString,
}

impl ApiToken {
    /// Create a token from a string.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Expose the token for use as a request header value.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl From<&str> for ApiToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ApiToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}
