//! Product result shapes returned to callers and stored in the cache.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::ProviderItem;

/// Sentinel used by the rich shape for attributes the provider did not supply.
pub const UNKNOWN: &str = "Unknown";

/// Detailed product record.
///
/// Every field is always present; missing provider data is [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichProduct {
    pub name: String,
    pub brand: String,
    pub price_usd: String,
    pub price_inr: String,
    pub weight: String,
    pub link: String,
}

/// Minimal search hit record. Absent fields are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeanProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// One product in a search response.
///
/// Serialized without a discriminator. `Rich` is listed first so that cached
/// rich records are never decoded as lean ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductResult {
    Rich(RichProduct),
    Lean(LeanProduct),
}

/// Deployment-wide choice of [`ProductResult`] shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultShape {
    #[default]
    Rich,
    Lean,
}

impl ResultShape {
    /// Maps a provider item into this shape.
    pub fn shape(self, item: &ProviderItem) -> ProductResult {
        match self {
            ResultShape::Rich => ProductResult::Rich(RichProduct {
                name: or_unknown(item.title.as_deref()),
                brand: or_unknown(item.brand()),
                price_usd: or_unknown(item.price()),
                // No currency conversion is performed.
                price_inr: UNKNOWN.to_string(),
                weight: or_unknown(item.weight()),
                link: or_unknown(item.link.as_deref()),
            }),
            ResultShape::Lean => ProductResult::Lean(LeanProduct {
                title: item.title.clone(),
                link: item.link.clone(),
                snippet: item.snippet.clone(),
            }),
        }
    }

    /// Maps every provider item, preserving order.
    pub fn shape_all(self, items: &[ProviderItem]) -> Vec<ProductResult> {
        items.iter().map(|item| self.shape(item)).collect()
    }

    /// Renders a rich record in this shape.
    ///
    /// Used for the static fallback set, which is authored in the rich shape.
    pub fn project(self, product: &RichProduct) -> ProductResult {
        match self {
            ResultShape::Rich => ProductResult::Rich(product.clone()),
            ResultShape::Lean => ProductResult::Lean(LeanProduct {
                title: Some(product.name.clone()),
                link: Some(product.link.clone()),
                snippet: Some(format!(
                    "{}, {}, {}",
                    product.brand, product.weight, product.price_usd
                )),
            }),
        }
    }
}

fn or_unknown(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

impl FromStr for ResultShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rich" => Ok(ResultShape::Rich),
            "lean" => Ok(ResultShape::Lean),
            other => Err(format!(
                "unknown result shape '{other}', expected 'rich' or 'lean'"
            )),
        }
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultShape::Rich => f.write_str("rich"),
            ResultShape::Lean => f.write_str("lean"),
        }
    }
}
