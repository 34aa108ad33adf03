use serde::Deserialize;
use url::Url;

use crate::catalog::DEFAULT_RECENTLY_WATCHED_LIMIT;
use crate::errors::{NetworkError, Result};

const ENV_PREFIX: &str = "BOMB_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    #[default]
    ApiKey,
    Bearer,
}

/// Settings read from `BOMB_`-prefixed environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    api_key: String,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    #[serde(default)]
    pub base_url: Option<Url>,
    #[serde(default = "default_recently_watched_limit")]
    pub recently_watched_limit: usize,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_recently_watched_limit() -> usize {
    DEFAULT_RECENTLY_WATCHED_LIMIT
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("auth_scheme", &self.auth_scheme)
            .field("base_url", &self.base_url)
            .field("recently_watched_limit", &self.recently_watched_limit)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// # Errors
    /// [`crate::Error::Config`]: If `BOMB_API_KEY` is missing or a value is malformed.
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// # Errors
    /// [`crate::Error::Config`]: If a value is missing or malformed.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    fn authorization(&self) -> giantbomb::Authorization {
        match self.auth_scheme {
            AuthScheme::ApiKey => giantbomb::Authorization::ApiKey(self.api_key.clone()),
            AuthScheme::Bearer => giantbomb::Authorization::Bearer(self.api_key.clone()),
        }
    }

    /// # Errors
    /// [`crate::Error::Network`]: If the http client cannot be built.
    pub fn api_client(&self) -> Result<giantbomb::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let reqwest = builder.build().map_err(NetworkError::from)?;
        let client = match &self.base_url {
            Some(base_url) => {
                giantbomb::Client::with_base_url(self.authorization(), reqwest, base_url.clone())
            }
            None => giantbomb::Client::new(self.authorization(), reqwest),
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[("BOMB_API_KEY", "abc")])).unwrap();
        assert_eq!(config.auth_scheme, AuthScheme::ApiKey);
        assert_eq!(config.recently_watched_limit, 100);
        assert!(config.base_url.is_none());
        assert!(config.api_client().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("BOMB_API_KEY", "abc"),
            ("BOMB_AUTH_SCHEME", "bearer"),
            ("BOMB_BASE_URL", "http://localhost:8080/api/"),
            ("BOMB_RECENTLY_WATCHED_LIMIT", "12"),
        ]))
        .unwrap();
        assert_eq!(config.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.recently_watched_limit, 12);
        assert_eq!(
            config.base_url.unwrap().as_str(),
            "http://localhost:8080/api/"
        );
    }

    #[test]
    fn test_missing_key() {
        let result = Config::from_vars(vars(&[("BOMB_RECENTLY_WATCHED_LIMIT", "12")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = Config::from_vars(vars(&[("BOMB_API_KEY", "abc")])).unwrap();
        assert!(!format!("{config:?}").contains("abc"));
    }
}
