//! Support ticket service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::support_ticket::{
    CreateSupportTicket, SupportTicket, SupportTicketRow, SupportTicketWithCustomer, TicketStatus,
};

const TICKET_WITH_CUSTOMER: &str = r#"
    SELECT t.id, t.customer_id, t.subject, t.description, t.status, t.created_at, t.updated_at,
           c.first_name, c.last_name, c.email, c.contact_phone
    FROM customer_support_tickets t
    INNER JOIN customers c ON c.id = t.customer_id
"#;

/// Open a new ticket.
pub async fn create(pool: &PgPool, input: &CreateSupportTicket) -> Result<SupportTicket, AppError> {
    let ticket = sqlx::query_as::<_, SupportTicket>(
        r#"
        INSERT INTO customer_support_tickets (customer_id, subject, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(input.customer_id)
    .bind(&input.subject)
    .bind(&input.description)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_foreign_key_violation(e, "Customer does not exist"))?;

    tracing::info!(ticket_id = %ticket.id, customer_id = %ticket.customer_id, "Support ticket opened");
    Ok(ticket)
}

/// All tickets with customer contact, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<SupportTicketWithCustomer>, AppError> {
    let sql = format!("{TICKET_WITH_CUSTOMER} ORDER BY t.created_at DESC");
    let rows = sqlx::query_as::<_, SupportTicketRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Tickets raised by one customer, newest first.
pub async fn list_by_customer(
    pool: &PgPool,
    customer_id: Uuid,
) -> Result<Vec<SupportTicket>, AppError> {
    let rows = sqlx::query_as::<_, SupportTicket>(
        "SELECT * FROM customer_support_tickets WHERE customer_id = $1 ORDER BY created_at DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Tickets in one status, newest first.
pub async fn list_by_status(
    pool: &PgPool,
    status: TicketStatus,
) -> Result<Vec<SupportTicketWithCustomer>, AppError> {
    let sql = format!("{TICKET_WITH_CUSTOMER} WHERE t.status = $1 ORDER BY t.created_at DESC");
    let rows = sqlx::query_as::<_, SupportTicketRow>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Find a ticket with its customer contact.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<SupportTicketWithCustomer, AppError> {
    let sql = format!("{TICKET_WITH_CUSTOMER} WHERE t.id = $1");
    sqlx::query_as::<_, SupportTicketRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound("Support ticket not found".to_string()))
}

/// Move a ticket to a new status.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: TicketStatus,
) -> Result<SupportTicket, AppError> {
    let ticket = sqlx::query_as::<_, SupportTicket>(
        r#"
        UPDATE customer_support_tickets SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Support ticket not found".to_string()))?;

    tracing::info!(ticket_id = %id, status = ?status, "Support ticket status updated");
    Ok(ticket)
}

/// Delete a ticket, returning the removed row.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<SupportTicket, AppError> {
    sqlx::query_as::<_, SupportTicket>(
        "DELETE FROM customer_support_tickets WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Support ticket not found".to_string()))
}
