use crate::plugins::traits::TrackerPlugin;

/// Strips a trailing single-character currency symbol from a price.
///
/// The last character is dropped unconditionally and the rest is trimmed.
/// Nothing is parsed or validated: `"EUR 5"` becomes `"EUR"` and `"€5"`
/// becomes `"€"`. Only prices of the form `<amount><ws?><symbol>` come out
/// as a bare amount.
pub fn normalize_price(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next_back();
    chars.as_str().trim().to_string()
}

pub struct PriceTracker;

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceTracker {
    pub fn new() -> Self {
        PriceTracker
    }
}

impl TrackerPlugin for PriceTracker {
    fn name(&self) -> &str {
        "Price Tracker"
    }

    fn plugin_type(&self) -> &str {
        "price"
    }

    fn description(&self) -> &str {
        "Strips the trailing currency symbol from a listed price"
    }

    fn normalize(&self, text: &str) -> String {
        normalize_price(text)
    }
}
