//! Ticket bookings placed by customers against events.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Only confirmed bookings count towards revenue.
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub event_id: Uuid,
    pub number_of_tickets: i32,
    pub total_amount: Decimal,
    pub booking_date: DateTime<Utc>,
    pub booking_status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub customer_id: Uuid,
    pub event_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    pub number_of_tickets: Option<i32>,
    /// Defaults to the event's ticket price times the number of tickets.
    pub total_amount: Option<Decimal>,
    pub booking_status: Option<BookingStatus>,
}

impl CreateBooking {
    pub fn tickets(&self) -> i32 {
        self.number_of_tickets.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBooking {
    #[validate(range(min = 1, max = 100))]
    pub number_of_tickets: Option<i32>,
    pub total_amount: Option<Decimal>,
    pub booking_status: Option<BookingStatus>,
}
