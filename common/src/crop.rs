use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::{parse_positive, FieldErrors, FilePart, FormFields};
use crate::user::{UserId, UserProfile};

/// Server-assigned crop listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropId(pub u64);

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category choices offered by the listing forms and the buyer filter.
pub const CROP_CATEGORIES: [&str; 7] = [
    "Cereals",
    "Legumes",
    "Vegetables",
    "Fruits",
    "Root Tubers",
    "Cash Crops",
    "Herbs & Spices",
];

/// Units offered by the add-crop form.
pub const CROP_UNITS: [&str; 5] = ["kg", "tons", "bags", "crates", "pieces"];

/// Quality grades offered by the add-crop form.
pub const QUALITY_GRADES: [&str; 3] = ["A", "B", "C"];

/// Where uploaded crop images are served from.
pub fn upload_url(filename: &str) -> String {
    format!("/static/uploads/{filename}")
}

fn place<'a>(location: Option<&'a str>, county: Option<&'a str>) -> &'a str {
    location
        .filter(|l| !l.trim().is_empty())
        .or(county)
        .unwrap_or_default()
}

/// A listing as returned by `GET /api/crops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: CropId,
    pub farmer_id: UserId,
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub price_per_unit: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub farmer_rating: Option<f64>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[serde(default)]
    pub quality_grade: Option<String>,
}

impl Crop {
    /// Location line for cards; falls back to the county.
    pub fn place(&self) -> &str {
        place(self.location.as_deref(), self.county.as_deref())
    }

    pub fn image_url(&self) -> Option<String> {
        self.image_filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(upload_url)
    }

    pub fn stars(&self) -> StarRating {
        StarRating::from_rating(self.farmer_rating.unwrap_or(0.0))
    }

    pub fn grade(&self) -> Option<&str> {
        self.quality_grade.as_deref().filter(|g| !g.is_empty())
    }

    pub fn harvested(&self) -> Option<&str> {
        self.harvest_date.as_deref().filter(|d| !d.is_empty())
    }
}

/// Body of `GET /api/crops`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CropList {
    #[serde(default)]
    pub crops: Vec<Crop>,
}

/// A single listing as returned by `GET /api/crops/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDetails {
    pub id: CropId,
    pub name: String,
    pub category: String,
    pub price_per_unit: f64,
    pub unit: String,
    pub quantity: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub farmer_id: UserId,
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
}

impl CropDetails {
    pub fn place(&self) -> &str {
        place(self.location.as_deref(), self.county.as_deref())
    }

    pub fn image_url(&self) -> Option<String> {
        self.image_filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(upload_url)
    }

    /// Route of the conversation with this listing's farmer.
    pub fn contact_path(&self) -> String {
        conversation_path(self.farmer_id)
    }
}

/// Body of `GET /api/crops/{id}/contact-farmer`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FarmerContact {
    pub farmer_id: UserId,
    pub farmer_name: String,
    #[serde(default)]
    pub contact_url: Option<String>,
}

pub fn conversation_path(partner: UserId) -> String {
    format!("/conversation/{partner}")
}

/// Five-star rendering of a farmer rating: whole stars, then a half star
/// when the fraction is at least one half, then empty stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub const MAX: u8 = 5;

    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(Self::MAX))
        } else {
            0.0
        };
        let full = rating.floor() as u8;
        let half = full < Self::MAX && rating.fract() >= 0.5;
        let empty = Self::MAX - full - u8::from(half);
        Self { full, half, empty }
    }
}

/// Accessible label, e.g. "3.5 out of 5 stars".
impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = f64::from(self.full) + if self.half { 0.5 } else { 0.0 };
        write!(f, "{shown} out of {} stars", Self::MAX)
    }
}

/// Buyer-side search filters. Every non-empty value becomes one query
/// parameter; empty values are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropFilters {
    pub category: String,
    pub county: String,
    pub max_price: String,
    pub search: String,
}

impl CropFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("category", &self.category),
            ("county", &self.county),
            ("max_price", &self.max_price),
            ("search", &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// Contents of the farmer's add-crop form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub unit: String,
    pub price_per_unit: String,
    pub description: String,
    pub harvest_date: String,
    pub expiry_date: String,
    pub location: String,
    pub county: String,
    pub quality_grade: String,
    pub image: Option<FilePart>,
}

impl CropForm {
    pub const REQUIRED: [(&'static str, &'static str); 5] = [
        ("name", "Name"),
        ("category", "Category"),
        ("quantity", "Quantity"),
        ("unit", "Unit"),
        ("price_per_unit", "Price per unit"),
    ];

    /// Empty form with location and county taken from the user's profile.
    pub fn for_profile(profile: &UserProfile) -> Self {
        let mut form = Self {
            quality_grade: QUALITY_GRADES[0].to_string(),
            ..Self::default()
        };
        form.prefill_location(profile);
        form
    }

    /// Fill blank location fields from the profile; typed values win.
    pub fn prefill_location(&mut self, profile: &UserProfile) {
        if self.location.trim().is_empty() {
            self.location = profile.location.clone();
        }
        if self.county.trim().is_empty() {
            self.county = profile.county.clone();
        }
    }

    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "category" => &self.category,
            "quantity" => &self.quantity,
            "unit" => &self.unit,
            "price_per_unit" => &self.price_per_unit,
            _ => "",
        }
    }

    /// Required fields present, quantity and price positive numbers.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, label) in Self::REQUIRED {
            if self.value(field).trim().is_empty() {
                errors.insert(field, format!("{label} is required"));
            }
        }
        if !self.quantity.trim().is_empty() && parse_positive(&self.quantity).is_none() {
            errors.insert("quantity", "Quantity must be a positive number");
        }
        if !self.price_per_unit.trim().is_empty() && parse_positive(&self.price_per_unit).is_none()
        {
            errors.insert("price_per_unit", "Price must be a positive number");
        }
        errors.into_result()
    }

    /// Multipart entries in form order; the image goes under `image`.
    pub fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new()
            .text("name", self.name.trim())
            .text("category", self.category.as_str())
            .text("quantity", self.quantity.trim())
            .text("unit", self.unit.as_str())
            .text("price_per_unit", self.price_per_unit.trim())
            .text("description", self.description.as_str())
            .text("harvest_date", self.harvest_date.as_str())
            .text("expiry_date", self.expiry_date.as_str())
            .text("location", self.location.as_str())
            .text("county", self.county.as_str())
            .text("quality_grade", self.quality_grade.as_str());
        if let Some(image) = &self.image {
            fields.push_file("image", image.clone());
        }
        fields
    }
}
