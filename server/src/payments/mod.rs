//! Payment gateway client
//!
//! Requests hosted checkout sessions from a Stripe-compatible REST API.
//! This flow is unrelated to the order record lifecycle: a session is an
//! opaque handle for a pending hosted payment, no order is created here.

use serde::Deserialize;

use crate::utils::AppError;

/// Payment gateway configuration
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Gateway secret key (bearer auth)
    pub secret_key: String,
    /// Gateway base URL (overridable for tests)
    pub api_base: String,
    pub success_url: String,
    pub cancel_url: String,
    /// ISO currency code, lowercase
    pub currency: String,
}

impl CheckoutConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:4200/success".into()),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:4200/error".into()),
            currency: std::env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "usd".into()),
        }
    }
}

/// One gateway line item: unit amount is in minor currency units (cents)
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i64,
}

impl CheckoutLineItem {
    /// Convert a major-unit price (e.g. 54.0 USD) to minor units (5400)
    pub fn from_price(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            unit_amount: (price * 100.0).round() as i64,
            quantity,
        }
    }
}

/// Hosted checkout session handle returned by the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
}

/// Gateway HTTP client
pub struct CheckoutClient {
    config: CheckoutConfig,
    http: reqwest::Client,
}

impl CheckoutClient {
    pub fn new(config: CheckoutConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Build the form-encoded session request body.
    ///
    /// The gateway expects indexed bracket notation for nested fields:
    /// `line_items[0][price_data][unit_amount]=5400` etc.
    fn session_form(&self, items: &[CheckoutLineItem]) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("success_url".into(), self.config.success_url.clone()),
            ("cancel_url".into(), self.config.cancel_url.clone()),
        ];

        for (i, item) in items.iter().enumerate() {
            form.push((
                format!("line_items[{i}][price_data][currency]"),
                self.config.currency.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        form
    }

    /// Request a hosted checkout session; returns the opaque session id.
    pub async fn create_session(
        &self,
        items: &[CheckoutLineItem],
    ) -> Result<CheckoutSession, AppError> {
        if items.is_empty() {
            return Err(AppError::validation(
                "Checkout session cannot be created - check the order items",
            ));
        }

        let url = format!("{}/v1/checkout/sessions", self.config.api_base);
        let form = self.session_form(items);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Payment gateway connection failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Payment gateway rejected the session: {status} - {text}"
            )));
        }

        resp.json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::upstream(format!("Invalid gateway response: {e}")))
    }
}
