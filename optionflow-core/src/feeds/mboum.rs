//! Mboum options endpoints

use super::{extract_records, FeedType, MarketDataFeed};
use crate::error::AlertError;
use crate::record::RawRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const ASSET_TYPE: &str = "STOCKS";

#[derive(Debug, Clone)]
pub struct MboumClient {
    api_key: String,
    client: Client,
    base_url: Url,
}

impl MboumClient {
    pub fn new(api_key: impl Into<String>, client: Client, base_url: &str) -> Result<Self, AlertError> {
        Ok(Self {
            api_key: api_key.into(),
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn path_for(feed: FeedType) -> &'static str {
        match feed {
            FeedType::UnusualActivity => "/v1/markets/options/unusual-options-activity",
            FeedType::OptionsFlow => "/v1/markets/options/options-flow",
        }
    }

    /// Endpoint URL with query string for one page of a feed
    pub fn endpoint(&self, feed: FeedType, page: u32) -> Result<Url, AlertError> {
        let mut url = self.base_url.join(Self::path_for(feed))?;
        url.query_pairs_mut()
            .append_pair("type", ASSET_TYPE)
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// One page of records, surfacing transport and status failures
    pub async fn try_fetch(&self, feed: FeedType, page: u32) -> Result<Vec<RawRecord>, AlertError> {
        let url = self.endpoint(feed, page)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        info!("📡 API Response: {} - Status: {}", Self::path_for(feed), status.as_u16());

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(extract_records(body))
    }
}

#[async_trait]
impl MarketDataFeed for MboumClient {
    async fn fetch_records(&self, feed: FeedType, page: u32) -> Vec<RawRecord> {
        match self.try_fetch(feed, page).await {
            Ok(records) => records,
            Err(e) if e.is_transient() => {
                warn!("⚠️ API unavailable for {}: {}", Self::path_for(feed), e);
                Vec::new()
            }
            Err(e) => {
                error!("❌ API error for {}: {}", Self::path_for(feed), e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "mboum"
    }
}
