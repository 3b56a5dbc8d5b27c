//! Ticketed events.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub event_date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub ticket_price: Decimal,
    pub available_tickets: i32,
    pub total_tickets: i32,
    pub is_active: bool,
    pub venue_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub event_date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub ticket_price: Decimal,
    #[validate(range(min = 0))]
    pub available_tickets: i32,
    #[validate(range(min = 0))]
    pub total_tickets: i32,
    pub is_active: Option<bool>,
    pub venue_id: Option<Uuid>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub ticket_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub available_tickets: Option<i32>,
    #[validate(range(min = 0))]
    pub total_tickets: Option<i32>,
    pub is_active: Option<bool>,
    pub venue_id: Option<Uuid>,
    #[validate(url)]
    pub image_url: Option<String>,
}
