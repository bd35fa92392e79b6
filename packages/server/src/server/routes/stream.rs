//! SSE listing stream.
//!
//! GET /api/listings/stream?location=Los%20Angeles,%20CA&minPrice=&maxPrice=&propertyType=&batchSize=&maxTotal=
//!
//! Each SSE `data:` line carries one JSON `StreamEvent`. The stream closes
//! after the single `complete` event. Closing the connection cancels the
//! session behind it.

use axum::{
    extract::{Extension, Query},
    http::header::{CACHE_CONTROL, CONNECTION},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::StreamExt;
use listing_feed::{SearchCriteria, DEFAULT_MAX_TOTAL};
use serde::Deserialize;
use std::str::FromStr;

use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

/// Raw query parameters. Numbers arrive as strings so that empty values
/// (`minPrice=`) mean "unset" instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamQuery {
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub property_type: Option<String>,
    pub batch_size: Option<String>,
    pub max_total: Option<String>,
}

impl StreamQuery {
    /// Validate into criteria, clamping `maxTotal` to `ceiling`.
    pub fn into_criteria(self, ceiling: usize) -> ApiResult<SearchCriteria> {
        let mut builder = SearchCriteria::builder(self.location.unwrap_or_default())
            .min_price(parse_param("minPrice", self.min_price)?)
            .max_price(parse_param("maxPrice", self.max_price)?)
            .property_type(self.property_type);

        if let Some(batch_size) = parse_param("batchSize", self.batch_size)? {
            builder = builder.batch_size(batch_size);
        }

        let max_total = parse_param("maxTotal", self.max_total)?
            .unwrap_or(DEFAULT_MAX_TOTAL)
            .min(ceiling);

        Ok(builder.max_total(max_total).build()?)
    }
}

fn parse_param<T: FromStr>(field: &'static str, value: Option<String>) -> ApiResult<Option<T>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ApiError::InvalidParam {
            field,
            value: raw.to_string(),
        }),
    }
}

/// SSE stream handler.
///
/// Criteria are validated up front; a bad request gets a 400 JSON body and
/// no stream. Upstream trouble never fails the request: it shows up as an
/// `error` event followed by demo listings.
pub async fn stream_listings_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<StreamQuery>,
) -> ApiResult<impl IntoResponse> {
    let criteria = query.into_criteria(state.max_total_ceiling)?;

    tracing::info!(
        location = criteria.location(),
        batch_size = criteria.batch_size(),
        max_total = criteria.max_total(),
        "Opening listing stream"
    );

    let events = state
        .feed
        .subscribe(criteria)
        .map(|event| Event::default().json_data(&event));

    Ok((
        [(CACHE_CONTROL, "no-cache"), (CONNECTION, "keep-alive")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> StreamQuery {
        let mut q = StreamQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "location" => q.location = value,
                "minPrice" => q.min_price = value,
                "maxPrice" => q.max_price = value,
                "propertyType" => q.property_type = value,
                "batchSize" => q.batch_size = value,
                "maxTotal" => q.max_total = value,
                other => panic!("unknown key {other}"),
            }
        }
        q
    }

    #[test]
    fn empty_values_are_unset() {
        let criteria = query(&[
            ("location", "Los Angeles, CA"),
            ("minPrice", ""),
            ("maxPrice", ""),
            ("propertyType", "all"),
        ])
        .into_criteria(50)
        .unwrap();

        assert_eq!(criteria.min_price(), None);
        assert_eq!(criteria.max_price(), None);
        assert_eq!(criteria.property_type(), None);
        assert_eq!(criteria.batch_size(), 5);
        assert_eq!(criteria.max_total(), 50);
    }

    #[test]
    fn max_total_is_clamped() {
        let criteria = query(&[("location", "Austin, TX"), ("maxTotal", "500")])
            .into_criteria(20)
            .unwrap();
        assert_eq!(criteria.max_total(), 20);

        let criteria = query(&[("location", "Austin, TX")])
            .into_criteria(10)
            .unwrap();
        assert_eq!(criteria.max_total(), 10);
    }

    #[test]
    fn rejects_non_numeric() {
        let err = query(&[("location", "Austin, TX"), ("minPrice", "cheap")])
            .into_criteria(50)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParam { field: "minPrice", .. }));
    }

    #[test]
    fn rejects_missing_location_and_zero_batch() {
        assert!(matches!(
            query(&[]).into_criteria(50),
            Err(ApiError::InvalidCriteria(_))
        ));
        assert!(matches!(
            query(&[("location", "Austin, TX"), ("batchSize", "0")]).into_criteria(50),
            Err(ApiError::InvalidCriteria(_))
        ));
    }
}
