use std::time::Duration;

use crate::constants::{
    DEFAULT_AUTHORITY, DEFAULT_GRAPH_API_URL, DEFAULT_SCOPES, LOGIN_CALLBACK_PATH,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings read once at startup, before the listener is bound.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub client_secret: String,
    /// Public base url of this app, without a trailing slash.
    pub base_url: String,
    pub authority: String,
    pub graph_api_url: String,
    pub scopes: Vec<String>,
    pub production: bool,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let client_id = require("AZURE_CLIENT_ID")?;
        let client_secret = require("AZURE_CLIENT_SECRET")?;
        let base_url = parse_base_url("BASE_URL", require("BASE_URL")?)?;

        let authority = match get("AZURE_AUTHORITY") {
            Some(x) => parse_base_url("AZURE_AUTHORITY", x)?,
            None => DEFAULT_AUTHORITY.to_owned(),
        };

        let graph_api_url = match get("GRAPH_API_URL") {
            Some(x) => parse_base_url("GRAPH_API_URL", x)?,
            None => DEFAULT_GRAPH_API_URL.to_owned(),
        };

        let scopes = get("AZURE_SCOPES")
            .unwrap_or_else(|| DEFAULT_SCOPES.to_owned())
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let port = match get("PORT") {
            Some(x) => x.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{x}' is not a valid port"),
            })?,
            None => 3000,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(x) => match x.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "UPSTREAM_TIMEOUT_SECS",
                        reason: format!("'{x}' is not a positive number of seconds"),
                    })
                }
            },
            None => Duration::from_secs(30),
        };

        let production = get("APP_ENV")
            .map(|x| x.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Config {
            host,
            port,
            client_id,
            client_secret,
            base_url,
            authority,
            graph_api_url,
            scopes,
            production,
            upstream_timeout,
        })
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}{LOGIN_CALLBACK_PATH}", self.base_url)
    }

    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/authorize", self.authority)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority)
    }

    /// Absolute url of the home page, optionally carrying an error indicator.
    pub fn home_url(&self, error: Option<&str>) -> String {
        match error {
            Some(error) => {
                let mut url = format!("{}/?", self.base_url);
                url.push_str(
                    &url::form_urlencoded::Serializer::new(String::new())
                        .append_pair("error", error)
                        .finish(),
                );
                url
            }
            None => format!("{}/", self.base_url),
        }
    }
}

fn parse_base_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value.trim()).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(value.trim().trim_end_matches('/').to_owned())
}

#[cfg(test)]
pub(crate) fn test_config(authority: &str, graph_api_url: &str) -> Config {
    test_config_with(authority, graph_api_url, &[])
}

#[cfg(test)]
pub(crate) fn test_config_with(
    authority: &str,
    graph_api_url: &str,
    extra: &[(&str, &str)],
) -> Config {
    let vars = [
        ("AZURE_CLIENT_ID", "test-client-id"),
        ("AZURE_CLIENT_SECRET", "test-client-secret"),
        ("BASE_URL", "http://localhost:3000"),
        ("AZURE_AUTHORITY", authority),
        ("GRAPH_API_URL", graph_api_url),
    ];

    Config::from_lookup(|key| {
        extra
            .iter()
            .chain(vars.iter())
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    })
    .expect("test config should be valid")
}
