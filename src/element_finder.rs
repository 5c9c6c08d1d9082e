use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::{ScraperConfig, DEFAULT_PRICE_ID, DEFAULT_TITLE_ID};
use crate::utils::error::{AppError, Result};

/// Locates a named field in a parsed page by element id.
pub trait ElementLookup {
    /// Text content of the element with the given id, or `None` when the
    /// page has no such element.
    fn text_by_id(&self, id: &str) -> Option<String>;
}

/// Element ids that hold the product title and price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSelectors {
    pub title_id: String,
    pub price_id: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            title_id: DEFAULT_TITLE_ID.to_string(),
            price_id: DEFAULT_PRICE_ID.to_string(),
        }
    }
}

impl From<&ScraperConfig> for PageSelectors {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            title_id: config.title_id.clone(),
            price_id: config.price_id.clone(),
        }
    }
}

/// Raw title and price text pulled from a product page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    /// Untouched price text, currency symbol and whitespace included.
    pub raw_price: String,
}

pub struct HtmlDocument {
    document: Html,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl ElementLookup for HtmlDocument {
    fn text_by_id(&self, id: &str) -> Option<String> {
        let selector = Selector::parse(&format!("#{}", id)).ok()?;
        self.document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
    }
}

pub fn extract_listing(doc: &impl ElementLookup, selectors: &PageSelectors) -> Result<Listing> {
    let title = doc
        .text_by_id(&selectors.title_id)
        .ok_or_else(|| AppError::ElementNotFound {
            id: selectors.title_id.clone(),
        })?;

    let raw_price = doc
        .text_by_id(&selectors.price_id)
        .ok_or_else(|| AppError::ElementNotFound {
            id: selectors.price_id.clone(),
        })?;

    Ok(Listing {
        title: title.trim().to_string(),
        raw_price,
    })
}
