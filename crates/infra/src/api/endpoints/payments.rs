use std::collections::BTreeMap;

use farmlink_domain::constants::DEFAULT_CURRENCY;
use farmlink_domain::{AddPaymentMethod, ConfirmPayment, CreatePaymentIntent};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Payment endpoints
///
/// Card data never passes through this client; the server talks to the
/// processor and hands back intents, keys and method ids.
pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create a payment intent
    ///
    /// # Arguments
    ///
    /// * `amount` - Amount in cents (1000 = $10.00)
    /// * `currency` - Currency code, `usd` when `None`
    /// * `metadata` - Optional metadata stored with the payment
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    #[instrument(skip(self, metadata))]
    pub async fn create_payment_intent<R: DeserializeOwned>(
        &self,
        amount: u64,
        currency: Option<&str>,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Result<R, ApiError> {
        let body = CreatePaymentIntent {
            amount,
            currency: currency.unwrap_or(DEFAULT_CURRENCY).to_string(),
            metadata,
        };
        let request = RequestConfig::post("/checkout/create-payment-intent").with_json(&body)?;
        self.client.request_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn confirm_payment<R: DeserializeOwned>(
        &self,
        payment_intent_id: &str,
        payment_method_id: Option<&str>,
    ) -> Result<R, ApiError> {
        let body = ConfirmPayment {
            payment_intent_id: payment_intent_id.to_string(),
            payment_method_id: payment_method_id.map(str::to_string),
        };
        self.client.request_json(RequestConfig::post("/payments/confirm").with_json(&body)?).await
    }

    pub async fn payment_methods<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/payments/methods")).await
    }

    pub async fn add_payment_method<R: DeserializeOwned>(&self, payment_method_id: &str) -> Result<R, ApiError> {
        let body = AddPaymentMethod { payment_method_id: payment_method_id.to_string() };
        self.client.request_json(RequestConfig::post("/payments/methods").with_json(&body)?).await
    }

    pub async fn remove_payment_method<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client
            .request_json(RequestConfig::delete(format!("/payments/methods/{}", segment(id))))
            .await
    }

    pub async fn set_default_payment_method<R: DeserializeOwned>(
        &self,
        payment_method_id: &str,
    ) -> Result<R, ApiError> {
        let path = format!("/payments/methods/{}/default", segment(payment_method_id));
        self.client.request_json(RequestConfig::put(path)).await
    }

    /// Ephemeral customer key for the native payment sheet
    pub async fn ephemeral_key<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/payments/ephemeral-key")).await
    }

    /// Setup intent for saving a card without charging it
    pub async fn create_setup_intent<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/payments/setup-intent")).await
    }
}
