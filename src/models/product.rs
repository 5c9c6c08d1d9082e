use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// One product to check, as listed in a watch-list file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ProductDescriptor {
    #[serde(rename = "seccion")]
    #[validate(length(min = 1, message = "section must not be empty"))]
    pub section: String,

    #[serde(rename = "marca")]
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,

    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
}

impl ProductDescriptor {
    pub fn new(section: impl Into<String>, brand: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            brand: brand.into(),
            url: url.into(),
        }
    }
}

/// The descriptors loaded from a single watch-list file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchList {
    pub path: PathBuf,
    pub products: Vec<ProductDescriptor>,
}

impl WatchList {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
