//! Venue CRUD and the venue-with-events view.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::Event;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::venue::{CreateVenue, UpdateVenue, Venue, VenueWithEvents};

/// Create a new venue.
pub async fn create(pool: &PgPool, input: &CreateVenue) -> Result<Venue, AppError> {
    let venue = sqlx::query_as::<_, Venue>(
        r#"
        INSERT INTO venues (venue_name, address, capacity, contact_number, description, image_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&input.venue_name)
    .bind(&input.address)
    .bind(input.capacity)
    .bind(&input.contact_number)
    .bind(&input.description)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await?;

    tracing::info!(venue_id = %venue.id, "Venue created");
    Ok(venue)
}

/// List venues alphabetically.
pub async fn list(pool: &PgPool, pagination: &Pagination) -> Result<PagedResult<Venue>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, Venue>(
        "SELECT * FROM venues ORDER BY venue_name ASC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find venue by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Venue, AppError> {
    sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))
}

/// Venue with every event it hosts, earliest first.
pub async fn find_with_events(pool: &PgPool, id: Uuid) -> Result<VenueWithEvents, AppError> {
    let venue = find_by_id(pool, id).await?;
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE venue_id = $1 ORDER BY event_date ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(VenueWithEvents { venue, events })
}

/// Update venue fields; absent fields are left unchanged.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateVenue) -> Result<Venue, AppError> {
    sqlx::query_as::<_, Venue>(
        r#"
        UPDATE venues SET
            venue_name = COALESCE($2, venue_name),
            address = COALESCE($3, address),
            capacity = COALESCE($4, capacity),
            contact_number = COALESCE($5, contact_number),
            description = COALESCE($6, description),
            image_url = COALESCE($7, image_url)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.venue_name)
    .bind(&input.address)
    .bind(input.capacity)
    .bind(&input.contact_number)
    .bind(&input.description)
    .bind(&input.image_url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))
}

/// Delete a venue. Its events keep existing with no venue.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM venues WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Venue not found".to_string()));
    }
    tracing::info!(venue_id = %id, "Venue deleted");
    Ok(())
}
