use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{
    ChainId, CompletedSwap, CreatePaymentRequest, PaymentRequestResponse, Quote, QuoteRequest,
    TokenInfo,
};

/// Typed HTTP client for the PayRoute API.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: Client,
    base_url: Url,
}

impl RouteClient {
    /// Create a new `RouteClient`.
    ///
    /// * `base_url` – root URL of the PayRoute server (e.g. `https://pay.example.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/payment-requests` – resolve the payment route for a new
    /// payment request.
    pub async fn create_payment_request(
        &self,
        payload: &CreatePaymentRequest,
    ) -> Result<PaymentRequestResponse, ClientError> {
        let url = self.base_url.join("/api/v1/payment-requests")?;
        let resp = self.http.post(url).json(payload).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/quotes` – fetch a swap quote.
    pub async fn get_quote(&self, payload: &QuoteRequest) -> Result<Quote, ClientError> {
        let url = self.base_url.join("/api/v1/quotes")?;
        let resp = self.http.post(url).json(payload).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/tokens?chain_id=…` – list known tokens on a chain.
    pub async fn list_tokens(&self, chain_id: ChainId) -> Result<Vec<TokenInfo>, ClientError> {
        let url = self.base_url.join("/api/v1/tokens")?;
        let resp = self
            .http
            .get(url)
            .query(&[("chain_id", chain_id.0)])
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/swaps` – report a swap executed by the wallet platform.
    ///
    /// The server accepts the report before the audit record is written.
    pub async fn report_swap(&self, swap: &CompletedSwap) -> Result<(), ClientError> {
        let url = self.base_url.join("/api/v1/swaps")?;
        let resp = self.http.post(url).json(swap).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(())
    }
}
