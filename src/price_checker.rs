use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::element_finder::{extract_listing, HtmlDocument, PageSelectors};
use crate::models::{PriceQuote, ProductDescriptor, WatchList};
use crate::plugins::notifiers::{DryRunTransport, EmailNotifier, SmtpMailTransport};
use crate::plugins::trackers::PriceTracker;
use crate::plugins::traits::{MailTransport, NotifierPlugin, TrackerPlugin};
use crate::scraper::{HttpFetcher, PageFetcher};
use crate::utils::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub files_processed: usize,
    pub products_checked: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub failures: Vec<ProductFailure>,
}

impl RunReport {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            files_processed: 0,
            products_checked: 0,
            notifications_sent: 0,
            notifications_failed: 0,
            failures: Vec::new(),
        }
    }
}

/// Runs one pass: fetch, extract, normalize and notify, one product at a
/// time.
pub struct PriceChecker {
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn NotifierPlugin>,
    tracker: Box<dyn TrackerPlugin>,
    selectors: PageSelectors,
    keep_going: bool,
}

impl PriceChecker {
    pub fn new(
        config: &AppConfig,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn NotifierPlugin>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            tracker: Box::new(PriceTracker::new()),
            selectors: PageSelectors::from(&config.scraper),
            keep_going: config.run.keep_going,
        }
    }

    /// Wires the HTTP fetcher and the SMTP notifier (or the dry-run one).
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.scraper.clone())?;

        let transport: Box<dyn MailTransport> = if config.run.dry_run {
            Box::new(DryRunTransport)
        } else {
            Box::new(SmtpMailTransport::new(config.smtp.clone()))
        };
        let notifier = EmailNotifier::new(&config.smtp, transport)?;

        Ok(Self::new(config, Box::new(fetcher), Box::new(notifier)))
    }

    pub fn with_tracker(mut self, tracker: Box<dyn TrackerPlugin>) -> Self {
        self.tracker = tracker;
        self
    }

    pub async fn check_product(&self, product: &ProductDescriptor) -> Result<PriceQuote> {
        let html = self.fetcher.fetch(&product.url).await?;

        let listing = {
            let document = HtmlDocument::parse(&html);
            extract_listing(&document, &self.selectors)?
        };

        Ok(PriceQuote {
            url: product.url.clone(),
            title: listing.title,
            price: self.tracker.normalize(&listing.raw_price),
        })
    }

    /// Processes every product of every list in order. Fetch and extraction
    /// errors end the pass unless `keep_going` is set. A rejected submission
    /// is only counted; failing to open a mail session always ends the pass.
    pub async fn run(&self, watch_lists: &[WatchList]) -> Result<RunReport> {
        let mut report = RunReport::start();

        for list in watch_lists {
            info!("Checking {} products from {}", list.len(), list.path.display());

            for product in &list.products {
                info!("Checking {} / {}: {}", product.section, product.brand, product.url);

                let quote = match self.check_product(product).await {
                    Ok(quote) => quote,
                    Err(e) if self.keep_going => {
                        warn!("Skipping {}: {}", product.url, e);
                        report.failures.push(ProductFailure {
                            url: product.url.clone(),
                            error: e.to_string(),
                        });
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                report.products_checked += 1;
                info!("{} costs {}", quote.title, quote.price);

                if self.notifier.notify(&quote).await?.success {
                    report.notifications_sent += 1;
                } else {
                    report.notifications_failed += 1;
                }
            }

            report.files_processed += 1;
        }

        report.finished_at = Some(Utc::now());
        Ok(report)
    }
}
