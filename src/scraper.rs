use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

pub const PAGE_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Retrieves the markup of a product page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET fetcher. One request per call, no retry.
pub struct HttpFetcher {
    client: Client,
    config: ScraperConfig,
}

impl HttpFetcher {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    async fn dump_page(&self, body: &str) -> Result<()> {
        if let Some(path) = &self.config.dump_html {
            tokio::fs::write(path, body).await?;
            debug!("Wrote fetched page to {}", path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, PAGE_CONTENT_TYPE)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes in {} ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );

        self.dump_page(&body).await?;
        Ok(body)
    }
}
