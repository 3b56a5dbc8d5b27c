//! Customer accounts, which double as the platform's login identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "customer_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerRole {
    Admin,
    User,
}

impl CustomerRole {
    /// Wire label used in JWT claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Full customer row from database (includes credentials, never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub role: CustomerRole,
    pub is_verified: bool,
    pub verification_code_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// "first last" as shown on dashboards and emails.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Customer response DTO. Excludes password and verification hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub role: CustomerRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            contact_phone: c.contact_phone,
            address: c.address,
            role: c.role,
            is_verified: c.is_verified,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomer {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 20))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// Contact subset embedded in support ticket views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> Customer {
        Customer {
            id: Uuid::nil(),
            first_name: "Jane".to_string(),
            last_name: "Wanjiku".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "secret_hash".to_string(),
            contact_phone: Some("0712345678".to_string()),
            address: None,
            role: CustomerRole::User,
            is_verified: false,
            verification_code_hash: Some("abc".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn customer_role_serialization() {
        let json = serde_json::to_string(&CustomerRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        assert_eq!(CustomerRole::from_label("user"), Some(CustomerRole::User));
        assert_eq!(CustomerRole::from_label("root"), None);
    }

    #[test]
    fn customer_response_excludes_secrets() {
        let json = serde_json::to_string(&CustomerResponse::from(sample_customer())).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret_hash"));
        assert!(!json.contains("verification"));
        assert!(json.contains("\"firstName\":\"Jane\""));
    }

    #[test]
    fn display_name_joins_first_and_last() {
        assert_eq!(sample_customer().display_name(), "Jane Wanjiku");
    }

    #[test]
    fn register_rejects_bad_email() {
        let input = RegisterCustomer {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            contact_phone: None,
            address: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn register_rejects_short_password() {
        let input = RegisterCustomer {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.co".to_string(),
            password: "short".to_string(),
            contact_phone: None,
            address: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
