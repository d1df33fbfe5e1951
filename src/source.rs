// 🌐 Cost Source - Fetches a city's cost page from upstream
//
// CostSource is the seam between the service and the network. The service
// only ever sees a finished CityCostSheet or a FetchError.

use crate::error::FetchError;
use crate::extractor::extract_costs;
use crate::sheet::CityCostSheet;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SOURCE_URL: &str = "https://www.numbeo.com/cost-of-living/in";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

#[async_trait]
pub trait CostSource: Send + Sync {
    /// Fetch the cost sheet for an already-normalized city name
    async fn fetch(&self, city: &str) -> Result<CityCostSheet, FetchError>;

    /// Get source name (for logging)
    fn name(&self) -> &str;
}

/// NumbeoSource - Scrapes the public cost-of-living page, prices in USD
pub struct NumbeoSource {
    client: reqwest::Client,
    base_url: String,
}

impl NumbeoSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        NumbeoSource {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn city_url(&self, city: &str) -> String {
        format!(
            "{}/{}?displayCurrency=USD",
            self.base_url,
            urlencoding::encode(city)
        )
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers
}

#[async_trait]
impl CostSource for NumbeoSource {
    async fn fetch(&self, city: &str) -> Result<CityCostSheet, FetchError> {
        let url = self.city_url(city);
        debug!(%url, "fetching cost page");

        let http_err = |source: reqwest::Error| FetchError::Http {
            city: city.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                city: city.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(http_err)?;
        let costs = extract_costs(&html);
        debug!(city, records = costs.len(), "extracted cost records");

        let sheet = CityCostSheet::new(city, costs);
        if sheet.is_empty() {
            return Err(FetchError::NoData(city.to_string()));
        }

        Ok(sheet)
    }

    fn name(&self) -> &str {
        "numbeo"
    }
}
