//! Safaricom Daraja STK push client and callback handling.

use std::sync::LazyLock;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::MpesaConfig;
use crate::errors::AppError;
use crate::services::payment;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static KENYAN_MSISDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?254|0)?([17]\d{8})$").expect("msisdn pattern is valid")
});

/// Body of `POST /mpesa/stkpush`. Fields are optional so that a missing
/// field is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StkPushRequest {
    pub phone_number: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
}

impl StkPushRequest {
    /// Check presence and shape of every field.
    pub fn into_parts(self) -> Result<(String, Decimal, Uuid), AppError> {
        let missing = || AppError::Validation("Missing required fields".to_string());
        let phone = self
            .phone_number
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(missing)?;
        let amount = self.amount.ok_or_else(missing)?;
        let payment_id = self
            .payment_id
            .ok_or_else(missing)?
            .parse::<Uuid>()
            .map_err(|_| AppError::Validation("paymentID must be a UUID".to_string()))?;
        Ok((phone, amount, payment_id))
    }
}

/// Daraja's STK push payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushPayload<'a> {
    business_short_code: &'a str,
    password: String,
    timestamp: String,
    transaction_type: &'static str,
    amount: u64,
    party_a: &'a str,
    party_b: &'a str,
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: String,
    account_reference: &'static str,
    transaction_desc: &'static str,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Callback envelope posted by the gateway once the customer acts on the prompt.
#[derive(Debug, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: Option<StkCallbackBody>,
}

#[derive(Debug, Deserialize)]
pub struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: Option<StkCallback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    pub result_code: i64,
    #[serde(default)]
    pub result_desc: Option<String>,
    #[serde(default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    pub value: Option<serde_json::Value>,
}

/// Outcome of a parsed callback.
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Payment succeeded; carries the receipt number when the gateway sent one.
    Paid { receipt: Option<String> },
    /// Customer cancelled, timed out or the charge failed.
    NotPaid { result_code: i64, description: Option<String> },
    /// Body did not contain an `stkCallback`.
    Malformed,
}

impl StkCallbackEnvelope {
    pub fn outcome(&self) -> CallbackOutcome {
        let Some(callback) = self.body.as_ref().and_then(|b| b.stk_callback.as_ref()) else {
            return CallbackOutcome::Malformed;
        };

        if callback.result_code != 0 {
            return CallbackOutcome::NotPaid {
                result_code: callback.result_code,
                description: callback.result_desc.clone(),
            };
        }

        let receipt = callback
            .callback_metadata
            .as_ref()
            .and_then(|m| m.items.iter().find(|i| i.name == "MpesaReceiptNumber"))
            .and_then(|i| i.value.as_ref())
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });

        CallbackOutcome::Paid { receipt }
    }
}

/// Normalise a Kenyan mobile number to `2547XXXXXXXX` / `2541XXXXXXXX`.
pub fn normalize_phone_number(raw: &str) -> Result<String, AppError> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    KENYAN_MSISDN
        .captures(&compact)
        .and_then(|caps| caps.get(1))
        .map(|subscriber| format!("254{}", subscriber.as_str()))
        .ok_or_else(|| AppError::Validation(format!("Invalid phone number: {raw}")))
}

/// Gateway timestamp, `YYYYMMDDHHMMSS`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// STK password: base64 of shortcode, passkey and timestamp concatenated.
pub fn generate_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// Daraja client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MpesaClient {
    http: Client,
    config: MpesaConfig,
}

impl MpesaClient {
    pub fn new(config: MpesaConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Fetch an OAuth access token with the consumer key and secret.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("M-Pesa token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "M-Pesa token request returned {}",
                response.status()
            )));
        }

        let body: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid M-Pesa token response: {e}")))?;
        Ok(body.access_token)
    }

    /// Prompt the customer's phone to pay `amount` for `payment_id`.
    pub async fn stk_push(
        &self,
        phone_number: &str,
        amount: Decimal,
        payment_id: Uuid,
    ) -> Result<serde_json::Value, AppError> {
        let phone = normalize_phone_number(phone_number)?;
        let amount = whole_shillings(amount)?;
        if !self.is_configured() {
            return Err(AppError::Upstream("M-Pesa is not configured".to_string()));
        }

        let token = self.access_token().await?;
        let timestamp = timestamp(Utc::now());

        let payload = StkPushPayload {
            business_short_code: &self.config.shortcode,
            password: generate_password(&self.config.shortcode, &self.config.passkey, &timestamp),
            timestamp,
            transaction_type: "CustomerPayBillOnline",
            amount,
            party_a: &phone,
            party_b: &self.config.shortcode,
            phone_number: &phone,
            call_back_url: format!("{}?payment_id={payment_id}", self.config.callback_url),
            account_reference: "EventBooking",
            transaction_desc: "Ticket Payment",
        };

        let url = format!(
            "{}/mpesa/stkpush/v1/processrequest",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("STK push request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "STK push rejected");
            return Err(AppError::Upstream(format!("STK push returned {status}")));
        }

        let data = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid STK push response: {e}")))?;

        tracing::info!(payment_id = %payment_id, "STK push initiated");
        Ok(data)
    }
}

/// The gateway only accepts whole, positive amounts.
fn whole_shillings(amount: Decimal) -> Result<u64, AppError> {
    use rust_decimal::prelude::ToPrimitive;

    amount
        .ceil()
        .to_u64()
        .filter(|a| *a > 0)
        .ok_or_else(|| AppError::Validation("amount must be greater than zero".to_string()))
}

/// Apply a gateway callback to the referenced payment.
pub async fn handle_callback(
    pool: &PgPool,
    payment_id: Uuid,
    envelope: &StkCallbackEnvelope,
) -> Result<(), AppError> {
    match envelope.outcome() {
        CallbackOutcome::Paid { receipt } => {
            payment::mark_completed(pool, payment_id, receipt.as_deref()).await
        }
        CallbackOutcome::NotPaid {
            result_code,
            description,
        } => {
            tracing::info!(
                payment_id = %payment_id,
                result_code,
                description = description.as_deref().unwrap_or_default(),
                "STK push not completed"
            );
            Ok(())
        }
        CallbackOutcome::Malformed => {
            tracing::warn!(payment_id = %payment_id, "Callback without stkCallback ignored");
            Ok(())
        }
    }
}
