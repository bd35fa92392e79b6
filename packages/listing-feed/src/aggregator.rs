//! Paginated search over the provider.
//!
//! Turns [`SearchCriteria`] into a lazy, finite sequence of raw records,
//! one page per call, strictly in offset order.

use reso_client::{Filter, Property, PropertyQuery, SortOrder};
use tracing::debug;

use crate::error::FetchResult;
use crate::fetcher::RateLimitedFetcher;
use crate::types::criteria::SearchCriteria;

/// One page of raw records, already truncated to the remaining budget.
#[derive(Debug, Clone)]
pub struct Batch {
    /// 1-based
    pub number: usize,
    pub offset: usize,
    pub records: Vec<Property>,
}

/// Why a search ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The provider returned no records
    EmptyPage,
    /// The provider returned fewer records than requested
    ShortPage,
    /// `max_total` records have been yielded
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Active,
    Ended(EndReason),
    Failed,
}

pub struct SearchAggregator {
    fetcher: RateLimitedFetcher,
    criteria: SearchCriteria,
    offset: usize,
    yielded: usize,
    batches: usize,
    progress: Progress,
}

impl SearchAggregator {
    pub fn new(fetcher: RateLimitedFetcher, criteria: SearchCriteria) -> Self {
        Self {
            fetcher,
            criteria,
            offset: 0,
            yielded: 0,
            batches: 0,
            progress: Progress::Active,
        }
    }

    /// Filter expression for the criteria; always restricted to active listings.
    pub fn filter_for(criteria: &SearchCriteria) -> Filter {
        let (locality, region) = criteria.locality_region();

        let mut filter = Filter::new().eq("City", locality);
        if let Some(region) = region {
            filter = filter.eq("StateOrProvince", region);
        }
        if let Some(min) = criteria.min_price() {
            filter = filter.ge("ListPrice", min as f64);
        }
        if let Some(max) = criteria.max_price() {
            filter = filter.le("ListPrice", max as f64);
        }
        if let Some(property_type) = criteria.property_type() {
            filter = filter.eq("PropertyType", property_type);
        }
        filter.eq("StandardStatus", "Active")
    }

    /// The page request at a given offset.
    pub fn query_for(criteria: &SearchCriteria, offset: usize) -> PropertyQuery {
        PropertyQuery::new(Self::filter_for(criteria))
            .order_by("ListPrice", SortOrder::Desc)
            .page(criteria.batch_size(), offset)
            .with_media(true)
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Records yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Set once the sequence has ended without error.
    pub fn end_reason(&self) -> Option<EndReason> {
        match self.progress {
            Progress::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    /// Fetch the next page.
    ///
    /// `Ok(None)` marks the natural end; an error is terminal and every later
    /// call returns `Ok(None)` without touching the provider.
    pub async fn next_batch(&mut self) -> FetchResult<Option<Batch>> {
        if self.progress != Progress::Active {
            return Ok(None);
        }

        let remaining = self.criteria.max_total().saturating_sub(self.yielded);
        if remaining == 0 {
            self.progress = Progress::Ended(EndReason::LimitReached);
            return Ok(None);
        }

        let query = Self::query_for(&self.criteria, self.offset);
        let page = match self.fetcher.fetch(&query).await {
            Ok(page) => page,
            Err(e) => {
                self.progress = Progress::Failed;
                return Err(e);
            }
        };

        let fetched = page.len();
        if fetched == 0 {
            debug!(offset = self.offset, "Empty page, search complete");
            self.progress = Progress::Ended(EndReason::EmptyPage);
            return Ok(None);
        }

        let mut records = page.value;
        records.truncate(remaining);

        self.batches += 1;
        let batch = Batch {
            number: self.batches,
            offset: self.offset,
            records,
        };

        self.yielded += batch.records.len();
        self.offset += self.criteria.batch_size();

        if self.yielded >= self.criteria.max_total() {
            self.progress = Progress::Ended(EndReason::LimitReached);
        } else if fetched < self.criteria.batch_size() {
            self.progress = Progress::Ended(EndReason::ShortPage);
        }

        debug!(
            batch = batch.number,
            offset = batch.offset,
            fetched,
            yielded = self.yielded,
            "Fetched batch"
        );
        Ok(Some(batch))
    }
}
