//! Payments recorded against bookings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_status: Option<PaymentStatus>,
    pub payment_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub customer_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayment {
    pub amount: Option<Decimal>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_labels_match_serde() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn create_payment_from_json() {
        let body = format!(
            r#"{{"customerId":"{id}","bookingId":"{id}","amount":"1200.00","paymentMethod":"M-Pesa"}}"#,
            id = Uuid::nil()
        );
        let input: CreatePayment = serde_json::from_str(&body).unwrap();
        assert_eq!(input.amount, Decimal::new(120000, 2));
        assert!(input.payment_status.is_none());
        assert!(input.validate().is_ok());
    }
}
