// Tracker plugin implementations
pub mod price;

pub use price::{normalize_price, PriceTracker};
