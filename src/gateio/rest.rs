//! REST client for the Gate.io v4 API

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::generate_auth_headers;
use super::messages::{
    CurrencyPairMessage, MarginCurrencyPairMessage, OrderMessage, OrderPayload, TradeMessage,
};
use crate::common::errors::{ExecutionError, Result};
use crate::common::traits::ExchangeApi;
use crate::common::types::{
    CurrencyPair, LeverageRecord, OrderRequest, OrderResult, PairMetadata, Trade,
};
use crate::config::types::{ApiCredentials, AppSettings, GateIoConfig};

const API_PREFIX: &str = "/api/v4";

/// REST client for the Gate.io v4 API
#[derive(Debug, Clone)]
pub struct GateIoRestClient {
    /// HTTP client
    client: Client,
    /// Base URL, e.g. `https://api.gateio.ws`
    base_url: String,
    /// Optional API credentials for order endpoints
    credentials: Option<ApiCredentials>,
}

impl GateIoRestClient {
    /// Create a new REST client (unauthenticated)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| ExecutionError::Configuration(format!("Invalid base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecutionError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Set API credentials for authenticated requests
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build a client from loaded configuration
    pub fn from_config(gateio: &GateIoConfig, settings: &AppSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.request_timeout_seconds);
        let client = Self::with_timeout(&gateio.rest_url, timeout)?;
        Ok(match gateio.credentials() {
            Some(credentials) => client.with_credentials(credentials),
            None => client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Option<&str>) -> Result<T> {
        let url = match query {
            Some(query) => format!("{}{}{}?{}", self.base_url, API_PREFIX, path, query),
            None => format!("{}{}{}", self.base_url, API_PREFIX, path),
        };
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ExecutionError::Authentication(
                "API credentials are required for order endpoints".to_string(),
            )
        })?;

        let body = serde_json::to_string(payload)?;
        let full_path = format!("{}{}", API_PREFIX, path);
        let headers = generate_auth_headers(credentials, "POST", &full_path, "", &body)?;

        let url = format!("{}{}", self.base_url, full_path);
        debug!("POST {}", url);

        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body);
        let response = headers.apply_to_request(request).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutionError::ExchangeRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ExchangeApi for GateIoRestClient {
    #[instrument(skip(self), fields(pair = %pair))]
    async fn list_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>> {
        let query = format!("currency_pair={}&limit={}", pair, limit);
        let messages: Vec<TradeMessage> = self.get_json("/spot/trades", Some(&query)).await?;

        messages.into_iter().map(Trade::try_from).collect()
    }

    #[instrument(skip(self), fields(pair = %pair))]
    async fn get_currency_pair(&self, pair: &CurrencyPair) -> Result<PairMetadata> {
        let path = format!("/spot/currency_pairs/{}", pair);
        let message: CurrencyPairMessage = self.get_json(&path, None).await?;

        PairMetadata::try_from(message)
    }

    #[instrument(skip(self))]
    async fn list_margin_currency_pairs(&self, quote: &str) -> Result<Vec<LeverageRecord>> {
        let messages: Vec<MarginCurrencyPairMessage> =
            self.get_json("/margin/currency_pairs", None).await?;

        let records = messages
            .into_iter()
            .filter(|msg| msg.quote_currency() == Some(quote))
            .filter_map(|msg| match LeverageRecord::try_from(msg) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed margin pair: {}", e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    #[instrument(skip(self, order), fields(pair = %order.pair, side = %order.side))]
    async fn create_spot_order(&self, order: &OrderRequest) -> Result<OrderResult> {
        let payload = OrderPayload::from(order);
        let message: OrderMessage = self.post_signed("/spot/orders", &payload).await?;

        OrderResult::try_from(message)
    }

    #[instrument(skip(self, order), fields(pair = %order.pair, side = %order.side))]
    async fn create_cross_margin_loan(&self, order: &OrderRequest) -> Result<OrderResult> {
        let payload = OrderPayload::from(order);
        let message: OrderMessage = self.post_signed("/margin/cross/loans", &payload).await?;

        OrderResult::try_from(message)
    }
}
