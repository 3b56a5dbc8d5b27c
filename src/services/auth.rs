//! Authentication service: password hashing, JWT, registration, verification and login.

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::customer::{Customer, CustomerResponse, RegisterCustomer};
use crate::services::customer as customer_service;
use crate::services::mailer::Mailer;

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned on successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login payload: tokens plus the public profile of the customer.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: CustomerResponse,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Six-digit numeric code mailed to new customers.
pub fn generate_verification_code() -> String {
    (100_000 + OsRng.next_u32() % 900_000).to_string()
}

/// Only the SHA-256 digest of a verification code is stored.
pub fn hash_verification_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.trim().as_bytes()))
}

/// Generate a JWT token pair (access + refresh).
pub fn generate_tokens(
    customer: &Customer,
    jwt_secret: &str,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
) -> Result<TokenPair, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let access_claims = Claims {
        sub: customer.id.to_string(),
        email: customer.email.clone(),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        role: customer.role.as_str().to_string(),
        token_type: "access".to_string(),
        exp: (now + Duration::seconds(access_expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let refresh_claims = Claims {
        token_type: "refresh".to_string(),
        exp: (now + Duration::seconds(refresh_expiry_secs)).timestamp(),
        ..access_claims.clone()
    };

    let access_token = jsonwebtoken::encode(&Header::default(), &access_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(&Header::default(), &refresh_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: access_expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Register a new unverified customer and mail them a verification code.
///
/// Mail delivery failures are logged; the account is created regardless.
pub async fn register(
    pool: &PgPool,
    mailer: &Mailer,
    input: &RegisterCustomer,
) -> Result<Customer, AppError> {
    let password_hash = hash_password(&input.password)?;
    let code = generate_verification_code();

    let customer = customer_service::create(
        pool,
        input,
        &password_hash,
        &hash_verification_code(&code),
    )
    .await?;

    tracing::info!(customer_id = %customer.id, "Customer registered");

    let name = customer.display_name();
    let text = format!("Hello {name}, your verification code is: {code}");
    let html = format!(
        "<div><h2>Hello {name},</h2>\
         <p>Your verification code is: <strong>{code}</strong></p>\
         <p>Enter this code to verify your account.</p></div>"
    );
    if let Err(e) = mailer
        .send(&customer.email, "Verify your account", &text, &html)
        .await
    {
        tracing::warn!(error = %e, customer_id = %customer.id, "Failed to send registration email");
    }

    Ok(customer)
}

/// Check a verification code and mark the customer verified.
pub async fn verify(
    pool: &PgPool,
    mailer: &Mailer,
    email: &str,
    code: &str,
) -> Result<(), AppError> {
    let customer = customer_service::find_by_email(pool, email)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    let matches = customer
        .verification_code_hash
        .as_deref()
        .is_some_and(|stored| stored == hash_verification_code(code));
    if !matches {
        return Err(AppError::Validation("Invalid verification code".to_string()));
    }

    customer_service::mark_verified(pool, customer.id).await?;
    tracing::info!(customer_id = %customer.id, "Customer verified");

    let name = customer.display_name();
    let text = format!(
        "Hello {name}, your account has been verified. You can now log in and use all features."
    );
    let html = format!(
        "<div><h2>Hello {name},</h2>\
         <p>Your account has been <strong>successfully verified</strong>!</p>\
         <p>You can now log in and enjoy our services.</p></div>"
    );
    if let Err(e) = mailer
        .send(&customer.email, "Account Verified Successfully", &text, &html)
        .await
    {
        tracing::warn!(error = %e, customer_id = %customer.id, "Failed to send verification email");
    }

    Ok(())
}

/// Authenticate a customer by email and password, returning a token pair.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    jwt_secret: &str,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
) -> Result<LoginResponse, AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation(
            "Email is required and must be a non-empty string.".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(AppError::Validation(
            "Password is required and must be a non-empty string.".to_string(),
        ));
    }

    let customer = customer_service::find_by_email(pool, email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &customer.password_hash)? {
        tracing::info!(customer_id = %customer.id, "Rejected login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let tokens = generate_tokens(&customer, jwt_secret, access_expiry_secs, refresh_expiry_secs)?;
    Ok(LoginResponse {
        tokens,
        user: CustomerResponse::from(customer),
    })
}

/// Refresh an access token using a valid refresh token.
pub async fn refresh_token(
    pool: &PgPool,
    refresh_token_str: &str,
    jwt_secret: &str,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token_str, jwt_secret)?;

    if claims.token_type != "refresh" {
        return Err(AppError::Unauthorized);
    }

    let customer_id: Uuid = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    let customer = customer_service::find_by_id(pool, customer_id)
        .await
        .map_err(|e| if e.is_not_found() { AppError::Unauthorized } else { e })?;

    generate_tokens(&customer, jwt_secret, access_expiry_secs, refresh_expiry_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::CustomerRole;

    fn customer(role: CustomerRole) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            first_name: "Amina".to_string(),
            last_name: "Hassan".to_string(),
            email: "amina@example.com".to_string(),
            password_hash: "hash".to_string(),
            contact_phone: None,
            address: None,
            role,
            is_verified: true,
            verification_code_hash: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_and_verify() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn verification_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn verification_code_hash_is_stable_and_trimmed() {
        let a = hash_verification_code("123456");
        let b = hash_verification_code(" 123456 ");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_verification_code("654321"));
    }

    #[test]
    fn token_generation_and_validation() {
        let c = customer(CustomerRole::Admin);
        let secret = "test-secret-key-for-jwt";
        let tokens = generate_tokens(&c, secret, 900, 604800).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 900);

        // Validate access token
        let claims = validate_token(&tokens.access_token, secret).unwrap();
        assert_eq!(claims.sub, c.id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.first_name, "Amina");

        // Validate refresh token
        let refresh_claims = validate_token(&tokens.refresh_token, secret).unwrap();
        assert_eq!(refresh_claims.token_type, "refresh");
        assert_eq!(refresh_claims.sub, claims.sub);
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let tokens = generate_tokens(&customer(CustomerRole::User), "one", 900, 900).unwrap();
        let result = validate_token(&tokens.access_token, "two");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn invalid_token_rejected() {
        let result = validate_token("garbage.token.here", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let secret = "test-secret";
        // Generate token that expired well beyond the 60s leeway window
        let tokens = generate_tokens(&customer(CustomerRole::User), secret, -3600, -3600).unwrap();
        let result = validate_token(&tokens.access_token, secret);
        assert!(result.is_err());
    }

    #[test]
    fn login_response_flattens_tokens() {
        let c = customer(CustomerRole::User);
        let tokens = generate_tokens(&c, "s", 60, 60).unwrap();
        let json = serde_json::to_value(LoginResponse {
            tokens,
            user: CustomerResponse::from(c),
        })
        .unwrap();
        assert!(json["accessToken"].is_string());
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["user"]["role"], "user");
        assert!(json["user"].get("passwordHash").is_none());
    }
}
