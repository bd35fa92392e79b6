use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use listing_feed::LimiterScope;
use secrecy::SecretString;

const DEFAULT_RESO_API_URL: &str = "https://api.bridgedataoutput.com/api/v2/OData/test";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub reso_api_url: String,
    /// Absent means every session serves demo listings
    pub reso_access_token: Option<SecretString>,
    pub request_spacing: Duration,
    pub limiter_scope: LimiterScope,
    pub max_total_ceiling: usize,
    /// `None` when `SEARCH_DEADLINE_SECS=0`
    pub search_deadline: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_total_ceiling: usize = get("MAX_TOTAL_CEILING")
            .unwrap_or_else(|| "50".to_string())
            .parse()
            .context("MAX_TOTAL_CEILING must be a valid number")?;
        if max_total_ceiling == 0 {
            return Err(anyhow!("MAX_TOTAL_CEILING must be greater than zero"));
        }

        let deadline_secs: u64 = get("SEARCH_DEADLINE_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse()
            .context("SEARCH_DEADLINE_SECS must be a valid number")?;

        Ok(Self {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            reso_api_url: get("RESO_API_URL").unwrap_or_else(|| DEFAULT_RESO_API_URL.to_string()),
            reso_access_token: get("RESO_ACCESS_TOKEN")
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            request_spacing: Duration::from_millis(
                get("REQUEST_SPACING_MS")
                    .unwrap_or_else(|| "1500".to_string())
                    .parse()
                    .context("REQUEST_SPACING_MS must be a valid number")?,
            ),
            limiter_scope: get("LIMITER_SCOPE")
                .map(|s| s.parse::<LimiterScope>())
                .transpose()
                .map_err(|e| anyhow!(e))
                .context("LIMITER_SCOPE must be `shared` or `per_session`")?
                .unwrap_or_default(),
            max_total_ceiling,
            search_deadline: (deadline_secs > 0).then(|| Duration::from_secs(deadline_secs)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.reso_api_url, DEFAULT_RESO_API_URL);
        assert!(config.reso_access_token.is_none());
        assert_eq!(config.request_spacing, Duration::from_millis(1500));
        assert_eq!(config.limiter_scope, LimiterScope::Shared);
        assert_eq!(config.max_total_ceiling, 50);
        assert_eq!(config.search_deadline, Some(Duration::from_secs(120)));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "3001"),
            ("RESO_ACCESS_TOKEN", "abc"),
            ("LIMITER_SCOPE", "per_session"),
            ("SEARCH_DEADLINE_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.port, 3001);
        assert!(config.reso_access_token.is_some());
        assert_eq!(config.limiter_scope, LimiterScope::PerSession);
        assert_eq!(config.search_deadline, None);
    }

    #[test]
    fn blank_token_is_unset() {
        let config = config(&[("RESO_ACCESS_TOKEN", "  ")]).unwrap();
        assert!(config.reso_access_token.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("LIMITER_SCOPE", "global")]).is_err());
        assert!(config(&[("MAX_TOTAL_CEILING", "0")]).is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let config = config(&[("RESO_ACCESS_TOKEN", "super-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
