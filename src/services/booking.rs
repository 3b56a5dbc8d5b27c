//! Booking CRUD.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::booking::{Booking, BookingStatus, CreateBooking, UpdateBooking};
use crate::models::pagination::{PagedResult, Pagination};

/// Price of `tickets` seats at `ticket_price`, rounded to cents.
pub fn booking_total(ticket_price: Decimal, tickets: i32) -> Decimal {
    (ticket_price * Decimal::from(tickets)).round_dp(2)
}

fn check_amount(amount: Decimal) -> Result<(), AppError> {
    if amount.is_sign_negative() {
        return Err(AppError::Validation(
            "totalAmount must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Create a booking, pricing it from the event when no total is supplied.
pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, AppError> {
    let tickets = input.tickets();
    let total_amount = match input.total_amount {
        Some(amount) => amount,
        None => {
            let price = sqlx::query_scalar::<_, Decimal>(
                "SELECT ticket_price FROM events WHERE id = $1",
            )
            .bind(input.event_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
            booking_total(price, tickets)
        }
    };
    check_amount(total_amount)?;

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (customer_id, event_id, number_of_tickets, total_amount, booking_status)
        VALUES ($1, $2, $3, $4, COALESCE($5, 'Confirmed'::booking_status))
        RETURNING *
        "#,
    )
    .bind(input.customer_id)
    .bind(input.event_id)
    .bind(tickets)
    .bind(total_amount)
    .bind(input.booking_status)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_foreign_key_violation(e, "Customer or event does not exist"))?;

    tracing::info!(
        booking_id = %booking.id,
        event_id = %booking.event_id,
        tickets,
        "Booking created"
    );
    Ok(booking)
}

/// List bookings, most recent first.
pub async fn list(pool: &PgPool, pagination: &Pagination) -> Result<PagedResult<Booking>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings ORDER BY booking_date DESC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find booking by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Booking, AppError> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// All bookings placed by one customer, most recent first.
pub async fn list_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<Vec<Booking>, AppError> {
    let rows = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY booking_date DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update ticket count, amount or status.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateBooking) -> Result<Booking, AppError> {
    if let Some(amount) = input.total_amount {
        check_amount(amount)?;
    }

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings SET
            number_of_tickets = COALESCE($2, number_of_tickets),
            total_amount = COALESCE($3, total_amount),
            booking_status = COALESCE($4, booking_status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.number_of_tickets)
    .bind(input.total_amount)
    .bind(input.booking_status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if input.booking_status == Some(BookingStatus::Cancelled) {
        tracing::info!(booking_id = %id, "Booking cancelled");
    }
    Ok(booking)
}

/// Delete a booking and, by cascade, its payments.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_multiplies_price_by_tickets() {
        assert_eq!(
            booking_total(Decimal::new(250050, 2), 3),
            Decimal::new(750150, 2)
        );
    }

    #[test]
    fn total_rounds_to_cents() {
        let price = Decimal::new(33333, 3); // 33.333
        assert_eq!(booking_total(price, 1), Decimal::new(3333, 2));
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(check_amount(Decimal::new(-500, 2)).is_err());
        assert!(check_amount(Decimal::ZERO).is_ok());
    }
}
