use serde::{Deserialize, Serialize};

/// Normalized result of checking one product, ready for the notifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub url: String,
    pub title: String,
    /// Price text with the currency symbol stripped. Not parsed as a number.
    pub price: String,
}
