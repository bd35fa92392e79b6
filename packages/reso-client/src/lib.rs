//! Pure RESO Web API client.
//!
//! A minimal client for OData-style listing providers (Bridge, Trestle and
//! similar). Supports filtered, sorted, offset-paginated searches over the
//! `Property` resource with optional `Media` expansion.
//!
//! The client does not retry. A 429 surfaces as [`ResoError::RateLimited`]
//! with the provider's `Retry-After` hint so the caller can decide.
//!
//! # Example
//!
//! ```rust,ignore
//! use reso_client::{Filter, PropertyQuery, ResoClient, SortOrder};
//!
//! let client = ResoClient::new("https://api.example.com/OData/test", "token")?;
//! let query = PropertyQuery::new(Filter::new().eq("City", "Los Angeles"))
//!     .order_by("ListPrice", SortOrder::Desc)
//!     .page(5, 0)
//!     .with_media(true);
//!
//! let page = client.search_properties(&query).await?;
//! for property in &page.value {
//!     println!("{:?}", property.unparsed_address);
//! }
//! ```

pub mod error;
pub mod query;
pub mod types;

pub use error::{ResoError, Result};
pub use query::{Filter, PropertyQuery, SortOrder};
pub use types::{Media, PriceChange, Property, PropertyPage};

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

const PROPERTY_RESOURCE: &str = "Property";

pub struct ResoClient {
    client: reqwest::Client,
    property_url: Url,
    token: SecretString,
}

impl ResoClient {
    /// Create a client for the given OData service root.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let property_url = Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            PROPERTY_RESOURCE
        ))?;

        Ok(Self {
            client,
            property_url,
            token: SecretString::from(token.into()),
        })
    }

    /// The resolved `Property` resource URL.
    pub fn property_url(&self) -> &Url {
        &self.property_url
    }

    /// Fetch one page of properties.
    pub async fn search_properties(&self, query: &PropertyQuery) -> Result<PropertyPage> {
        let resp = self
            .client
            .get(self.property_url.clone())
            .bearer_auth(self.token.expose_secret())
            .query(&query.to_params())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(resp.headers());
            tracing::debug!(?retry_after, "Provider returned 429");
            return Err(ResoError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ResoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        let page: PropertyPage = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            top = query.top,
            skip = query.skip,
            returned = page.len(),
            "Fetched property page"
        );
        Ok(page)
    }
}

impl std::fmt::Debug for ResoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResoClient")
            .field("property_url", &self.property_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// `Retry-After` is either delta-seconds or an HTTP date.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    (at - Utc::now()).to_std().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
    }

    #[test]
    fn retry_after_past_date_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn retry_after_missing_or_garbage() {
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn property_url_joins_resource() {
        let client = ResoClient::new("https://api.example.com/OData/test/", "t").unwrap();
        assert_eq!(
            client.property_url().as_str(),
            "https://api.example.com/OData/test/Property"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let client = ResoClient::new("https://api.example.com", "sk-very-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
