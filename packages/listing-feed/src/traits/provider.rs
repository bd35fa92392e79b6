//! ListingProvider trait: the seam between the feed and the upstream API.

use async_trait::async_trait;
use reso_client::{PropertyPage, PropertyQuery, ResoClient};

use crate::error::ProviderResult;

/// A queryable source of raw property records.
///
/// Implementations perform exactly one request per call and classify the
/// outcome; pacing and retries belong to
/// [`RateLimitedFetcher`](crate::fetcher::RateLimitedFetcher).
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Fetch one page of properties.
    async fn search(&self, query: &PropertyQuery) -> ProviderResult<PropertyPage>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "provider"
    }
}

#[async_trait]
impl ListingProvider for ResoClient {
    async fn search(&self, query: &PropertyQuery) -> ProviderResult<PropertyPage> {
        Ok(self.search_properties(query).await?)
    }

    fn name(&self) -> &str {
        "reso"
    }
}
