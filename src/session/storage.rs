use crate::error::Result;

/// Key under which the short-lived access token is stored
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Key under which the refresh token is stored
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Trait for session storage backends
///
/// A store holds at most one string per key. An absent key means there is no
/// session value for it; implementations must never fail a read, a store that
/// cannot be read behaves as an empty one.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every stored value
    fn clear(&self) -> Result<()>;

    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// Persist the tokens obtained from a login
    ///
    /// A login that returns no refresh token drops any stale one so that a
    /// later refresh cannot resurrect a previous session.
    fn save_tokens(&self, access: &str, refresh: Option<&str>) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, access)?;
        match refresh {
            Some(refresh) => self.set(REFRESH_TOKEN_KEY, refresh),
            None => self.remove(REFRESH_TOKEN_KEY),
        }
    }

    /// A stored refresh token alone is enough: the next request recovers
    /// the access token through the refresh path
    fn has_session(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }
}
