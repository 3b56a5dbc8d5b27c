//! Venues that host events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::event::Event;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Uuid,
    pub venue_name: String,
    pub address: String,
    pub capacity: i32,
    pub contact_number: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenue {
    #[validate(length(min = 1, max = 100))]
    pub venue_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenue {
    #[validate(length(min = 1, max = 100))]
    pub venue_name: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// A venue together with the events it hosts, ordered by event date.
#[derive(Debug, Clone, Serialize)]
pub struct VenueWithEvents {
    #[serde(flatten)]
    pub venue: Venue,
    pub events: Vec<Event>,
}
