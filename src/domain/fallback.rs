//! Static results served when the upstream provider cannot be reached.

use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{ProductResult, ResultShape, RichProduct};

/// What the gateway does when the upstream call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamFailurePolicy {
    /// Serve [`fallback_products`] with a success status and cache them.
    #[default]
    Fallback,
    /// Surface the failure to the caller as a server error. Nothing is cached.
    Strict,
}

impl FromStr for UpstreamFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown upstream failure policy '{other}', expected 'fallback' or 'strict'"
            )),
        }
    }
}

impl fmt::Display for UpstreamFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallback => f.write_str("fallback"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

fn product(
    name: &str,
    brand: &str,
    price_usd: &str,
    price_inr: &str,
    weight: &str,
    link: &str,
) -> RichProduct {
    RichProduct {
        name: name.to_string(),
        brand: brand.to_string(),
        price_usd: price_usd.to_string(),
        price_inr: price_inr.to_string(),
        weight: weight.to_string(),
        link: link.to_string(),
    }
}

/// The fixed fallback catalogue, in the rich shape.
pub fn fallback_catalogue() -> Vec<RichProduct> {
    vec![
        product(
            "365 WholeFoods Peanut Butter",
            "WholeFoods",
            "$5.99",
            "₹527",
            "500g",
            "https://example.com/product1",
        ),
        product(
            "Organic Peanut Butter",
            "Organic Co",
            "$6.49",
            "₹571",
            "400g",
            "https://example.com/product2",
        ),
    ]
}

/// The fallback catalogue rendered in the deployment's result shape.
pub fn fallback_products(shape: ResultShape) -> Vec<ProductResult> {
    fallback_catalogue()
        .iter()
        .map(|product| shape.project(product))
        .collect()
}
