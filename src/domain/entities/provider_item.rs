//! Upstream search payload as returned by the provider.
//!
//! Only the fields the gateway reads are modelled. Nested shopping metadata is
//! optional at every level and is exposed through explicit accessors instead
//! of being defaulted inline.

use serde::Deserialize;
use serde_json::Value;

/// Top-level provider response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPayload {
    /// Missing `items` means zero results, not an error.
    #[serde(default)]
    pub items: Vec<ProviderItem>,
}

/// A single provider search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub pagemap: Option<PageMap>,
}

/// Structured data the provider extracted from the result page.
///
/// Leaf values are kept as raw JSON; anything that is not a string is treated
/// as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMap {
    #[serde(default)]
    pub brand: Vec<Value>,

    #[serde(default)]
    pub offer: Vec<Offer>,

    #[serde(default)]
    pub product: Vec<ProductMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Offer {
    pub price: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductMeta {
    pub weight: Option<Value>,
}

impl ProviderItem {
    /// First brand listed in the page metadata.
    pub fn brand(&self) -> Option<&str> {
        self.pagemap.as_ref()?.brand.first()?.as_str()
    }

    /// Price of the first offer.
    pub fn price(&self) -> Option<&str> {
        self.pagemap.as_ref()?.offer.first()?.price.as_ref()?.as_str()
    }

    /// Weight of the first product entry.
    pub fn weight(&self) -> Option<&str> {
        self.pagemap.as_ref()?.product.first()?.weight.as_ref()?.as_str()
    }
}
