//! Customer persistence: account creation, lookup, profile updates and deletion.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::customer::{Customer, CustomerResponse, RegisterCustomer, UpdateCustomer};
use crate::models::pagination::{PagedResult, Pagination};

/// Insert a customer with already-hashed credentials.
pub async fn create(
    pool: &PgPool,
    input: &RegisterCustomer,
    password_hash: &str,
    verification_code_hash: &str,
) -> Result<Customer, AppError> {
    sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (first_name, last_name, email, password_hash,
            contact_phone, address, verification_code_hash)
        VALUES ($1, $2, LOWER($3), $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.email.trim())
    .bind(password_hash)
    .bind(&input.contact_phone)
    .bind(&input.address)
    .bind(verification_code_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_unique_violation(e, "A customer with this email already exists"))
}

/// Find customer by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Customer, AppError> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

/// Find customer by email (case-insensitive).
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Customer>, AppError> {
    let customer =
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(pool)
            .await?;
    Ok(customer)
}

/// List customers, newest first.
pub async fn list(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<CustomerResponse>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    let items = rows.into_iter().map(CustomerResponse::from).collect();
    Ok(PagedResult::new(items, total, pagination))
}

/// Update profile fields; absent fields are left unchanged.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateCustomer) -> Result<Customer, AppError> {
    sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customers SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            contact_phone = COALESCE($4, contact_phone),
            address = COALESCE($5, address),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.contact_phone)
    .bind(&input.address)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

/// Mark the customer verified and discard the pending code.
pub async fn mark_verified(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE customers SET is_verified = true, verification_code_hash = NULL, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a customer; bookings, payments and tickets cascade.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }
    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(())
}
