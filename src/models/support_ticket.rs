//! Customer support tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::CustomerContact;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "ticket_status")]
pub enum TicketStatus {
    Open,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const VALID_LABELS: &'static str = "Open, In Progress, Resolved, Closed";

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Open" => Some(Self::Open),
            "In Progress" => Some(Self::InProgress),
            "Resolved" => Some(Self::Resolved),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket joined with the owning customer's contact columns.
#[derive(Debug, Clone, FromRow)]
pub struct SupportTicketRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_phone: Option<String>,
}

/// Ticket with the customer nested, as returned by admin views.
#[derive(Debug, Clone, Serialize)]
pub struct SupportTicketWithCustomer {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub customer: CustomerContact,
}

impl From<SupportTicketRow> for SupportTicketWithCustomer {
    fn from(row: SupportTicketRow) -> Self {
        Self {
            customer: CustomerContact {
                id: row.customer_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                contact_phone: row.contact_phone,
            },
            ticket: SupportTicket {
                id: row.id,
                customer_id: row.customer_id,
                subject: row.subject,
                description: row.description,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupportTicket {
    pub customer_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicketStatus {
    pub status: TicketStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_spaced_label() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(
            TicketStatus::from_label("In Progress"),
            Some(TicketStatus::InProgress)
        );
        assert_eq!(TicketStatus::from_label("InProgress"), None);
    }

    #[test]
    fn row_nests_customer_contact() {
        let now = Utc::now();
        let row = SupportTicketRow {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            subject: "Refund".to_string(),
            description: "Event cancelled".to_string(),
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
            first_name: "Otieno".to_string(),
            last_name: "Ouma".to_string(),
            email: "otieno@example.com".to_string(),
            contact_phone: None,
        };
        let json = serde_json::to_value(SupportTicketWithCustomer::from(row)).unwrap();
        assert_eq!(json["subject"], "Refund");
        assert_eq!(json["status"], "Open");
        assert_eq!(json["customer"]["firstName"], "Otieno");
    }

    #[test]
    fn create_ticket_requires_subject() {
        let input = CreateSupportTicket {
            customer_id: Uuid::nil(),
            subject: String::new(),
            description: "help".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
