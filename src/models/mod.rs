pub mod product;
pub mod price_quote;

// Re-exports for convenience
pub use product::*;
pub use price_quote::*;
