use serde::{Deserialize, Serialize};

pub const NO_PRICE_DATA: &str = "No market price data available";

/// One row of `GET /api/market-prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub crop_name: String,
    #[serde(default)]
    pub location: String,
    pub average_price: f64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl MarketPrice {
    pub fn source_label(&self) -> &str {
        self.source.as_deref().filter(|s| !s.is_empty()).unwrap_or("-")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceList {
    #[serde(default)]
    pub prices: Vec<MarketPrice>,
}

/// Lookup parameters for `GET /api/market-prices`; blanks are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuery {
    pub crop_name: String,
    pub location: String,
}

impl PriceQuery {
    pub fn for_crop(crop_name: impl Into<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
            location: String::new(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [("crop_name", &self.crop_name), ("location", &self.location)]
            .into_iter()
            .filter_map(|(k, v)| {
                let v = v.trim();
                (!v.is_empty()).then(|| (k, v.to_string()))
            })
            .collect()
    }
}

/// Body of `GET /api/locations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationList {
    #[serde(default)]
    pub counties: Vec<String>,
}
