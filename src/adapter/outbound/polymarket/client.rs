//! Polymarket REST API client.
//!
//! Supports two API surfaces:
//! - **CLOB API** (`clob.polymarket.com`) for order book snapshots
//! - **Data API** (`data-api.polymarket.com`) for wallet positions

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::dto::book::BookResponse;
use super::dto::position::PositionResponse;
use super::settings::PolymarketConfig;
use crate::domain::{book::Book, id::TokenId, position::Position};
use crate::error::Result;
use crate::port::outbound::{exchange::MarketData, portfolio::Portfolio};

/// Page size for position queries.
const POSITIONS_LIMIT: usize = 100;

/// HTTP client for the Polymarket REST APIs.
pub struct PolymarketClient {
    http: HttpClient,
    /// CLOB API base URL.
    base_url: String,
    /// Data API base URL.
    data_api_url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl PolymarketClient {
    #[must_use]
    pub fn from_config(config: &PolymarketConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            data_api_url: config.data_api_url.trim_end_matches('/').to_string(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }

    /// GET `url` with `query`, retrying transient failures.
    ///
    /// A 404 is returned as `None`; any other error status fails.
    async fn get_with_retry<T>(&self, url: &str, query: &[(&str, String)]) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = self.http.get(url).query(query).send().await;
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(err) => return Err(err.into()),
            };

            let parsed = response.json::<T>().await;
            match parsed {
                Ok(parsed) => return Ok(Some(parsed)),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    /// Fetch the raw `/book` response for a token.
    pub async fn get_book(&self, token_id: &TokenId) -> Result<Option<BookResponse>> {
        let url = format!("{}/book", self.base_url);
        self.get_with_retry(&url, &[("token_id", token_id.to_string())])
            .await
    }

    /// Fetch redeemable positions for `owner`, largest cash PnL first.
    pub async fn get_redeemable_positions(&self, owner: Address) -> Result<Vec<PositionResponse>> {
        let url = format!("{}/positions", self.data_api_url);
        let query = [
            ("user", owner.to_string()),
            ("limit", POSITIONS_LIMIT.to_string()),
            ("redeemable", "true".to_string()),
            ("sortBy", "CASHPNL".to_string()),
            ("sortDirection", "DESC".to_string()),
        ];

        let positions: Vec<PositionResponse> =
            self.get_with_retry(&url, &query).await?.unwrap_or_default();
        debug!(count = positions.len(), owner = %owner, "Fetched redeemable positions");
        Ok(positions)
    }
}

#[async_trait]
impl MarketData for PolymarketClient {
    async fn order_book(&self, token_id: &TokenId) -> Result<Option<Book>> {
        let book = self.get_book(token_id).await?.map(|response| response.to_book());
        if book.is_none() {
            debug!(token_id = %token_id, "No order book for token");
        }
        Ok(book)
    }
}

#[async_trait]
impl Portfolio for PolymarketClient {
    async fn redeemable_positions(&self, owner: Address) -> Result<Vec<Position>> {
        let positions = self.get_redeemable_positions(owner).await?;
        Ok(positions.into_iter().map(Position::from).collect())
    }
}
