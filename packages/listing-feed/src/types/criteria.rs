//! Search criteria for one streaming search.

use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_TOTAL: usize = 50;

/// Validated search criteria.
///
/// Construct through [`SearchCriteria::builder`]; `build()` guarantees a
/// non-empty location, `batch_size > 0`, `max_total > 0` and an ordered
/// price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    location: String,
    min_price: Option<u64>,
    max_price: Option<u64>,
    property_type: Option<String>,
    batch_size: usize,
    max_total: usize,
}

impl SearchCriteria {
    pub fn builder(location: impl Into<String>) -> CriteriaBuilder {
        CriteriaBuilder {
            location: location.into(),
            min_price: None,
            max_price: None,
            property_type: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_total: DEFAULT_MAX_TOTAL,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Split "Los Angeles, CA" into locality and region.
    ///
    /// Only the first comma separates; a location without a comma is all locality.
    pub fn locality_region(&self) -> (&str, Option<&str>) {
        match self.location.split_once(',') {
            Some((locality, region)) => {
                let region = region.trim();
                (
                    locality.trim(),
                    if region.is_empty() { None } else { Some(region) },
                )
            }
            None => (self.location.trim(), None),
        }
    }

    pub fn min_price(&self) -> Option<u64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<u64> {
        self.max_price
    }

    /// `None` means every property type.
    pub fn property_type(&self) -> Option<&str> {
        self.property_type.as_deref()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }
}

/// Builder for [`SearchCriteria`].
#[derive(Debug, Clone)]
pub struct CriteriaBuilder {
    location: String,
    min_price: Option<u64>,
    max_price: Option<u64>,
    property_type: Option<String>,
    batch_size: usize,
    max_total: usize,
}

impl CriteriaBuilder {
    pub fn min_price(mut self, price: Option<u64>) -> Self {
        self.min_price = price;
        self
    }

    pub fn max_price(mut self, price: Option<u64>) -> Self {
        self.max_price = price;
        self
    }

    /// `"all"` (any case) and blank values clear the filter.
    pub fn property_type(mut self, property_type: Option<impl Into<String>>) -> Self {
        self.property_type = property_type
            .map(Into::into)
            .map(|t: String| t.trim().to_string())
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"));
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn max_total(mut self, max_total: usize) -> Self {
        self.max_total = max_total;
        self
    }

    pub fn build(self) -> Result<SearchCriteria, CriteriaError> {
        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(CriteriaError::EmptyLocation);
        }
        if self.batch_size == 0 {
            return Err(CriteriaError::ZeroBatchSize);
        }
        if self.max_total == 0 {
            return Err(CriteriaError::ZeroMaxTotal);
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CriteriaError::InvertedPriceRange { min, max });
            }
        }

        Ok(SearchCriteria {
            location,
            min_price: self.min_price,
            max_price: self.max_price,
            property_type: self.property_type,
            batch_size: self.batch_size,
            max_total: self.max_total,
        })
    }
}
