//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the listing feed
//! without making real network calls or waiting on real time.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use reso_client::{Media, Property, PropertyPage, PropertyQuery};

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{Clock, ListingProvider};

/// A scripted provider response.
#[derive(Debug, Clone)]
enum Scripted {
    Respond(ProviderResult<PropertyPage>),
    /// Never completes; simulates a request stuck in flight.
    Hang,
}

/// Mock provider with a queue of scripted responses.
///
/// Once the queue is drained every call gets the fallback response
/// (an empty page unless [`MockProvider::repeating_page_of`] is used).
/// Clones share state, so a test can keep a handle for assertions.
#[derive(Clone)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    fallback: Arc<Mutex<Option<usize>>>,
    calls: Arc<Mutex<Vec<PropertyQuery>>>,
    next_key: Arc<Mutex<usize>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_key: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a page of `n` generated properties.
    pub fn with_page_of(self, n: usize) -> Self {
        self.push_page_of(n);
        self
    }

    /// Queue a specific page.
    pub fn with_page(self, page: PropertyPage) -> Self {
        self.push(Scripted::Respond(Ok(page)));
        self
    }

    /// Queue an error.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.push_error(error);
        self
    }

    /// Queue a request that never completes.
    pub fn with_hang(self) -> Self {
        self.push(Scripted::Hang);
        self
    }

    /// After the script runs out, answer every call with `n` fresh properties.
    pub fn repeating_page_of(self, n: usize) -> Self {
        *self.fallback.lock().unwrap() = Some(n);
        self
    }

    pub fn push_page_of(&self, n: usize) {
        let page = self.generate_page(n);
        self.push(Scripted::Respond(Ok(page)));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.push(Scripted::Respond(Err(error)));
    }

    fn push(&self, scripted: Scripted) {
        self.script.lock().unwrap().push_back(scripted);
    }

    fn generate_page(&self, n: usize) -> PropertyPage {
        let mut next = self.next_key.lock().unwrap();
        let value = (0..n)
            .map(|_| {
                *next += 1;
                sample_property(*next)
            })
            .collect();
        PropertyPage::new(value)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Queries received, in order.
    pub fn calls(&self) -> Vec<PropertyQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingProvider for MockProvider {
    async fn search(&self, query: &PropertyQuery) -> ProviderResult<PropertyPage> {
        self.calls.lock().unwrap().push(query.clone());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Respond(result)) => result,
            Some(Scripted::Hang) => std::future::pending().await,
            None => {
                let fallback = *self.fallback.lock().unwrap();
                Ok(match fallback {
                    Some(n) => self.generate_page(n),
                    None => PropertyPage::default(),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Virtual clock: `sleep` returns immediately after advancing time.
///
/// Every non-zero sleep is recorded for assertions.
pub struct MockClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap() += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            self.sleeps.lock().unwrap().push(duration);
            self.advance(duration);
        }
        // Give other tasks (and cancellation) a chance to run.
        tokio::task::yield_now().await;
    }
}

/// A plausible, fully populated provider record.
pub fn sample_property(n: usize) -> Property {
    Property {
        listing_key: Some(format!("LK{n:05}")),
        listing_id: Some(format!("MLS-{n}")),
        standard_status: Some("Active".to_string()),
        unparsed_address: Some(format!("{} Sunset Blvd", 100 + n)),
        city: Some("Los Angeles".to_string()),
        state_or_province: Some("CA".to_string()),
        postal_code: Some("90026".to_string()),
        subdivision_name: Some("Echo Park".to_string()),
        list_price: Some(900_000.0 + (n as f64) * 1_000.0),
        bedrooms_total: Some(3),
        bathrooms_total_integer: Some(2),
        bathrooms_total_decimal: Some(2.5),
        living_area: Some(1_800.0),
        year_built: Some(1962),
        property_type: Some("Residential".to_string()),
        public_remarks: Some("Hillside bungalow with city views.".to_string()),
        days_on_market: Some(21),
        pool_private_yn: Some(false),
        fireplace_yn: Some(true),
        waterfront_yn: Some(false),
        view_yn: Some(true),
        garage_yn: Some(true),
        walk_score: Some(78),
        media: Some(vec![
            Media {
                media_url: Some(format!("https://photos.example.com/{n}/front.jpg")),
                media_category: Some("Photo".to_string()),
                order: Some(1),
            },
            Media {
                media_url: Some(format!("https://photos.example.com/{n}/plan.pdf")),
                media_category: Some("FloorPlan".to_string()),
                order: Some(2),
            },
        ]),
        price_history: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reso_client::Filter;

    #[tokio::test]
    async fn script_then_fallback() {
        let provider = MockProvider::new()
            .with_page_of(2)
            .with_error(ProviderError::Network("down".into()));
        let query = PropertyQuery::new(Filter::new());

        assert_eq!(provider.search(&query).await.unwrap().len(), 2);
        assert!(provider.search(&query).await.is_err());
        assert!(provider.search(&query).await.unwrap().is_empty());
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn generated_keys_are_unique() {
        let provider = MockProvider::new().repeating_page_of(3);
        let query = PropertyQuery::new(Filter::new());

        let a = provider.search(&query).await.unwrap();
        let b = provider.search(&query).await.unwrap();

        assert_ne!(a.value[0].listing_key, b.value[0].listing_key);
    }

    #[tokio::test]
    async fn mock_clock_advances_on_sleep() {
        let clock = MockClock::new();
        let before = clock.now();

        clock.sleep(Duration::from_millis(250)).await;
        clock.sleep(Duration::ZERO).await;

        assert_eq!(clock.now() - before, Duration::from_millis(250));
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(250)]);
    }
}
