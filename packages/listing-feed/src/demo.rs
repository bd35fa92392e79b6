//! Fixed sample listings served when the live provider is unavailable.

use crate::types::listing::{EstimatedValue, Listing, PriceHistory, PricePoint, Trend};

/// Deterministic demo dataset.
///
/// Every call returns the same listings in the same order, including
/// estimated values and price history.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDataSource;

struct Seed {
    id: &'static str,
    address: &'static str,
    price: u64,
    bedrooms: u32,
    bathrooms: f64,
    area: u32,
    year_built: i32,
    property_type: &'static str,
    description: &'static str,
    features: &'static [&'static str],
    neighborhood: &'static str,
    walk_score: u32,
    days_on_market: u32,
    estimate: u64,
    history: [(&'static str, u64); 2],
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: "demo-1",
        address: "1428 Elm Street, Los Angeles, CA 90026",
        price: 1_250_000,
        bedrooms: 4,
        bathrooms: 3.0,
        area: 2_400,
        year_built: 1928,
        property_type: "Residential",
        description: "Restored Spanish revival with original tile and a shaded courtyard.",
        features: &["Fireplace", "View", "Parking"],
        neighborhood: "Silver Lake",
        walk_score: 82,
        days_on_market: 9,
        estimate: 1_287_500,
        history: [("2026-09", 1_187_500), ("2026-10", 1_250_000)],
    },
    Seed {
        id: "demo-2",
        address: "88 Harbor View Dr, Long Beach, CA 90802",
        price: 2_150_000,
        bedrooms: 5,
        bathrooms: 4.5,
        area: 3_600,
        year_built: 2004,
        property_type: "Residential",
        description: "Waterfront home with private dock and panoramic harbor views.",
        features: &["Pool", "Waterfront", "View", "Parking"],
        neighborhood: "Naples",
        walk_score: 64,
        days_on_market: 32,
        estimate: 2_107_000,
        history: [("2026-09", 2_042_500), ("2026-10", 2_150_000)],
    },
    Seed {
        id: "demo-3",
        address: "310 Spring St #604, Los Angeles, CA 90013",
        price: 685_000,
        bedrooms: 1,
        bathrooms: 1.0,
        area: 850,
        year_built: 1912,
        property_type: "Condominium",
        description: "Loft in a converted bank building, high ceilings and exposed brick.",
        features: &["View"],
        neighborhood: "Downtown",
        walk_score: 97,
        days_on_market: 74,
        estimate: 671_300,
        history: [("2026-08", 650_750), ("2026-10", 685_000)],
    },
    Seed {
        id: "demo-4",
        address: "2201 Canyon Rd, Pasadena, CA 91107",
        price: 1_495_000,
        bedrooms: 4,
        bathrooms: 3.5,
        area: 2_950,
        year_built: 1965,
        property_type: "Residential",
        description: "Mid-century post and beam on a quiet cul-de-sac.",
        features: &["Pool", "Fireplace", "Parking"],
        neighborhood: "Hastings Ranch",
        walk_score: 41,
        days_on_market: 18,
        estimate: 1_539_850,
        history: [("2026-09", 1_420_250), ("2026-10", 1_495_000)],
    },
    Seed {
        id: "demo-5",
        address: "47 Ocean Park Blvd, Santa Monica, CA 90405",
        price: 940_000,
        bedrooms: 2,
        bathrooms: 2.0,
        area: 1_150,
        year_built: 1987,
        property_type: "Townhouse",
        description: "Two-level townhome a few blocks from the beach.",
        features: &["Fireplace", "Parking"],
        neighborhood: "Ocean Park",
        walk_score: 88,
        days_on_market: 5,
        estimate: 958_800,
        history: [("2026-10", 893_000), ("2026-10", 940_000)],
    },
    Seed {
        id: "demo-6",
        address: "9 Ridgecrest Ln, Altadena, CA 91001",
        price: 420_000,
        bedrooms: 0,
        bathrooms: 0.0,
        area: 0,
        year_built: 2026,
        property_type: "Land",
        description: "Buildable hillside lot with utilities at the street.",
        features: &["View"],
        neighborhood: "Altadena",
        walk_score: 12,
        days_on_market: 120,
        estimate: 403_200,
        history: [("2026-06", 399_000), ("2026-10", 420_000)],
    },
];

const DEMO_IMAGE_BASE: &str = "/images/demo";

impl DemoDataSource {
    pub fn new() -> Self {
        Self
    }

    pub fn len(&self) -> usize {
        SEEDS.len()
    }

    pub fn is_empty(&self) -> bool {
        SEEDS.is_empty()
    }

    /// The full demo sequence.
    pub fn listings(&self) -> Vec<Listing> {
        SEEDS.iter().map(Seed::to_listing).collect()
    }
}

impl Seed {
    fn to_listing(&self) -> Listing {
        let image = format!("{DEMO_IMAGE_BASE}/{}.jpg", self.id);
        let price_per_area = if self.area > 0 {
            (self.price as f64 / self.area as f64).round() as u64
        } else {
            0
        };

        Listing {
            id: self.id.to_string(),
            address: self.address.to_string(),
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            year_built: self.year_built,
            property_type: self.property_type.to_string(),
            images: vec![image.clone()],
            image,
            description: self.description.to_string(),
            features: self.features.iter().map(|f| f.to_string()).collect(),
            neighborhood: self.neighborhood.to_string(),
            walk_score: self.walk_score,
            trend: Trend::from_days_on_market(self.days_on_market),
            days_on_market: self.days_on_market,
            price_per_area,
            premium: self.price > 1_000_000 || self.features.len() > 3,
            estimated_value: EstimatedValue::approximate(self.estimate),
            price_history: PriceHistory {
                points: self
                    .history
                    .iter()
                    .map(|(period, price)| PricePoint::new(*period, *price))
                    .collect(),
                synthetic: true,
            },
        }
    }
}
