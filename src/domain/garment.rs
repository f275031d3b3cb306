//! Clothing descriptor supplied with a try-on request

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Garment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClothingType {
    Shirt,
    Pants,
    Dress,
    Jacket,
    Skirt,
    Shoes,
    Sweater,
    Coat,
    Unknown,
}

impl ClothingType {
    /// Resolve a free-form type name.
    ///
    /// Matching is case-insensitive. Anything unrecognized becomes `Shirt`,
    /// so a bad optional field never fails a request.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "shirt" => ClothingType::Shirt,
            "pants" => ClothingType::Pants,
            "dress" => ClothingType::Dress,
            "jacket" => ClothingType::Jacket,
            "skirt" => ClothingType::Skirt,
            "shoes" => ClothingType::Shoes,
            "sweater" => ClothingType::Sweater,
            "coat" => ClothingType::Coat,
            "unknown" => ClothingType::Unknown,
            _ => ClothingType::Shirt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Shirt => "shirt",
            ClothingType::Pants => "pants",
            ClothingType::Dress => "dress",
            ClothingType::Jacket => "jacket",
            ClothingType::Skirt => "skirt",
            ClothingType::Shoes => "shoes",
            ClothingType::Sweater => "sweater",
            ClothingType::Coat => "coat",
            ClothingType::Unknown => "unknown",
        }
    }
}

impl Default for ClothingType {
    fn default() -> Self {
        ClothingType::Shirt
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clothing item being tried on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClothingItem {
    pub item_type: ClothingType,
    pub color: String,
    pub pattern: String,
    pub size: String,
    pub fit: String,
    pub style: String,
}

impl ClothingItem {
    /// Short text handed to the synthesis provider, e.g. "black shirt"
    pub fn description(&self) -> String {
        format!("{} {}", self.color, self.item_type)
    }
}

impl Default for ClothingItem {
    fn default() -> Self {
        ClothingItem {
            item_type: ClothingType::Shirt,
            color: "black".to_string(),
            pattern: "solid".to_string(),
            size: "M".to_string(),
            fit: "regular".to_string(),
            style: "casual".to_string(),
        }
    }
}
