use serde::{Deserialize, Serialize};

/// A single record from the RESO `Property` resource.
///
/// Every field is optional: providers populate different subsets of the
/// Data Dictionary and normalization happens downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Property {
    pub listing_key: Option<String>,
    pub listing_id: Option<String>,
    pub standard_status: Option<String>,

    pub unparsed_address: Option<String>,
    pub city: Option<String>,
    pub state_or_province: Option<String>,
    pub postal_code: Option<String>,
    pub subdivision_name: Option<String>,

    pub list_price: Option<f64>,
    pub bedrooms_total: Option<u32>,
    pub bathrooms_total_integer: Option<u32>,
    pub bathrooms_total_decimal: Option<f64>,
    pub living_area: Option<f64>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub public_remarks: Option<String>,
    pub days_on_market: Option<u32>,

    #[serde(rename = "PoolPrivateYN")]
    pub pool_private_yn: Option<bool>,
    #[serde(rename = "FireplaceYN")]
    pub fireplace_yn: Option<bool>,
    #[serde(rename = "WaterfrontYN")]
    pub waterfront_yn: Option<bool>,
    #[serde(rename = "ViewYN")]
    pub view_yn: Option<bool>,
    #[serde(rename = "GarageYN")]
    pub garage_yn: Option<bool>,

    /// Local field; not part of the Data Dictionary.
    pub walk_score: Option<u32>,

    /// Present only when the query expands `Media`.
    pub media: Option<Vec<Media>>,

    /// Local field; some feeds attach historical list prices.
    pub price_history: Option<Vec<PriceChange>>,
}

/// An expanded `Media` item attached to a property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Media {
    #[serde(rename = "MediaURL")]
    pub media_url: Option<String>,
    /// e.g. "Photo", "FloorPlan", "Video"
    pub media_category: Option<String>,
    pub order: Option<u32>,
}

/// One historical price point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceChange {
    pub period: String,
    pub price: f64,
}

/// One page of an OData collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyPage {
    #[serde(default)]
    pub value: Vec<Property>,

    #[serde(rename = "@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl PropertyPage {
    pub fn new(value: Vec<Property>) -> Self {
        Self {
            value,
            count: None,
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bridge_style_payload() {
        let body = r#"{
            "@odata.context": "https://api.example.com/$metadata#Property",
            "@odata.count": 2,
            "value": [
                {
                    "ListingKey": "P1",
                    "ListPrice": 1250000,
                    "City": "Los Angeles",
                    "StateOrProvince": "CA",
                    "BedroomsTotal": 4,
                    "BathroomsTotalDecimal": 3.5,
                    "PoolPrivateYN": true,
                    "Media": [
                        {"MediaURL": "https://img/1.jpg", "MediaCategory": "Photo", "Order": 1}
                    ]
                },
                {"ListingKey": "P2", "ListPrice": null}
            ]
        }"#;

        let page: PropertyPage = serde_json::from_str(body).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.count, Some(2));
        let first = &page.value[0];
        assert_eq!(first.listing_key.as_deref(), Some("P1"));
        assert_eq!(first.list_price, Some(1_250_000.0));
        assert_eq!(first.pool_private_yn, Some(true));
        assert_eq!(
            first.media.as_ref().unwrap()[0].media_url.as_deref(),
            Some("https://img/1.jpg")
        );
        assert_eq!(page.value[1].list_price, None);
    }

    #[test]
    fn missing_value_is_empty_page() {
        let page: PropertyPage = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
    }
}
