//! Payment CRUD and gateway status updates.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::payment::{CreatePayment, Payment, PaymentStatus, UpdatePayment};

fn check_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Record a payment against a booking.
pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, AppError> {
    check_amount(input.amount)?;

    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (customer_id, booking_id, amount, payment_status, payment_method, transaction_id)
        VALUES ($1, $2, $3, COALESCE($4, 'Pending'::payment_status), $5, $6)
        RETURNING *
        "#,
    )
    .bind(input.customer_id)
    .bind(input.booking_id)
    .bind(input.amount)
    .bind(input.payment_status)
    .bind(&input.payment_method)
    .bind(&input.transaction_id)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_foreign_key_violation(e, "Customer or booking does not exist"))?;

    tracing::info!(payment_id = %payment.id, booking_id = %payment.booking_id, "Payment recorded");
    Ok(payment)
}

/// List payments, most recent first.
pub async fn list(pool: &PgPool, pagination: &Pagination) -> Result<PagedResult<Payment>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments ORDER BY payment_date DESC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find payment by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Payment, AppError> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
}

/// All payments made by one customer, most recent first.
pub async fn list_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<Vec<Payment>, AppError> {
    let rows = sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE customer_id = $1 ORDER BY payment_date DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update payment fields; absent fields are left unchanged.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdatePayment) -> Result<Payment, AppError> {
    if let Some(amount) = input.amount {
        check_amount(amount)?;
    }

    sqlx::query_as::<_, Payment>(
        r#"
        UPDATE payments SET
            amount = COALESCE($2, amount),
            payment_status = COALESCE($3, payment_status),
            payment_method = COALESCE($4, payment_method),
            transaction_id = COALESCE($5, transaction_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.amount)
    .bind(input.payment_status)
    .bind(&input.payment_method)
    .bind(&input.transaction_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
}

/// Mark a payment completed with the gateway's receipt number.
pub async fn mark_completed(
    pool: &PgPool,
    id: Uuid,
    transaction_id: Option<&str>,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE payments SET
            payment_status = $2,
            transaction_id = COALESCE($3, transaction_id),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(PaymentStatus::Completed)
    .bind(transaction_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Payment not found".to_string()));
    }
    tracing::info!(payment_id = %id, "Payment completed");
    Ok(())
}

/// Delete a payment.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Payment not found".to_string()));
    }
    tracing::info!(payment_id = %id, "Payment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive() {
        assert!(check_amount(Decimal::ZERO).is_err());
        assert!(check_amount(Decimal::new(-1, 2)).is_err());
        assert!(check_amount(Decimal::new(1, 2)).is_ok());
    }
}
