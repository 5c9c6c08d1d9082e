pub mod config;
pub mod element_finder;
pub mod logging;
pub mod models;
pub mod plugins;
pub mod price_checker;
pub mod scraper;
pub mod utils;
pub mod watchlist;

// Re-export commonly used types
pub use config::AppConfig;
pub use models::{PriceQuote, ProductDescriptor, WatchList};
pub use price_checker::{PriceChecker, RunReport};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
