//! Event CRUD.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::models::pagination::{PagedResult, Pagination};

/// Cross-field checks the derive validators cannot express.
fn check_event_bounds(
    ticket_price: Decimal,
    available_tickets: i32,
    total_tickets: i32,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if ticket_price.is_sign_negative() {
        return Err(AppError::Validation(
            "ticketPrice must not be negative".to_string(),
        ));
    }
    if available_tickets > total_tickets {
        return Err(AppError::Validation(
            "availableTickets cannot exceed totalTickets".to_string(),
        ));
    }
    if end_time.is_some_and(|end| end < start_time) {
        return Err(AppError::Validation(
            "endTime must not be before startTime".to_string(),
        ));
    }
    Ok(())
}

/// Create a new event.
pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, AppError> {
    check_event_bounds(
        input.ticket_price,
        input.available_tickets,
        input.total_tickets,
        input.start_time,
        input.end_time,
    )?;

    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, description, category, event_date, start_time, end_time,
            ticket_price, available_tickets, total_tickets, is_active, venue_id, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, true), $11, $12)
        RETURNING *
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.category)
    .bind(input.event_date)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.ticket_price)
    .bind(input.available_tickets)
    .bind(input.total_tickets)
    .bind(input.is_active)
    .bind(input.venue_id)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_foreign_key_violation(e, "Venue does not exist"))?;

    tracing::info!(event_id = %event.id, title = %event.title, "Event created");
    Ok(event)
}

/// List events by date.
pub async fn list(pool: &PgPool, pagination: &Pagination) -> Result<PagedResult<Event>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, Event>(
        "SELECT * FROM events ORDER BY event_date ASC, title ASC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find event by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

/// Update event fields; absent fields are left unchanged.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateEvent) -> Result<Event, AppError> {
    let existing = find_by_id(pool, id).await?;
    check_event_bounds(
        input.ticket_price.unwrap_or(existing.ticket_price),
        input.available_tickets.unwrap_or(existing.available_tickets),
        input.total_tickets.unwrap_or(existing.total_tickets),
        input.start_time.unwrap_or(existing.start_time),
        input.end_time.or(existing.end_time),
    )?;

    let event = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            event_date = COALESCE($5, event_date),
            start_time = COALESCE($6, start_time),
            end_time = COALESCE($7, end_time),
            ticket_price = COALESCE($8, ticket_price),
            available_tickets = COALESCE($9, available_tickets),
            total_tickets = COALESCE($10, total_tickets),
            is_active = COALESCE($11, is_active),
            venue_id = COALESCE($12, venue_id),
            image_url = COALESCE($13, image_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.category)
    .bind(input.event_date)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.ticket_price)
    .bind(input.available_tickets)
    .bind(input.total_tickets)
    .bind(input.is_active)
    .bind(input.venue_id)
    .bind(&input.image_url)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_foreign_key_violation(e, "Venue does not exist"))?
    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(event)
}

/// Delete an event and, by cascade, its bookings.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    tracing::info!(event_id = %id, "Event deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn bounds_accept_valid_event() {
        let start = Utc::now();
        assert!(check_event_bounds(
            Decimal::new(1000, 0),
            10,
            10,
            start,
            Some(start + Duration::hours(3))
        )
        .is_ok());
    }

    #[test]
    fn bounds_reject_oversold_capacity() {
        let err = check_event_bounds(Decimal::ONE, 11, 10, Utc::now(), None).unwrap_err();
        assert!(err.to_string().contains("availableTickets"));
    }

    #[test]
    fn bounds_reject_negative_price() {
        let err = check_event_bounds(Decimal::new(-1, 0), 1, 1, Utc::now(), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn bounds_reject_end_before_start() {
        let start = Utc::now();
        let err =
            check_event_bounds(Decimal::ONE, 1, 1, start, Some(start - Duration::minutes(1)))
                .unwrap_err();
        assert!(err.to_string().contains("endTime"));
    }
}
