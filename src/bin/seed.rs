//! Seed script for development. Populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use ticketing::services::auth::hash_password;

const ADMIN_EMAIL: &str = "admin@ticketing.local";
const ADMIN_PASSWORD: &str = "Admin123!";
const CUSTOMER_PASSWORD: &str = "Customer123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = ticketing::db::create_pool(&db_url, 5).await?;

    ticketing::db::run_migrations(&pool).await?;

    println!("=== Ticketing Seed Script ===");

    seed_admin(&pool).await?;
    let customers = seed_customers(&pool).await?;
    let venues = seed_venues(&pool).await?;
    let events = seed_events(&pool, &venues).await?;
    seed_bookings_and_payments(&pool, &customers, &events).await?;
    seed_support_tickets(&pool, &customers).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");
    println!("Customer logins use password {CUSTOMER_PASSWORD}");

    Ok(())
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<()> {
    let hash = hash_password(ADMIN_PASSWORD)?;

    let updated = sqlx::query("UPDATE customers SET password_hash = $1 WHERE email = $2")
        .bind(&hash)
        .bind(ADMIN_EMAIL)
        .execute(pool)
        .await?;
    if updated.rows_affected() > 0 {
        println!("[done] Updated admin password");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO customers (first_name, last_name, email, password_hash, role, is_verified)
         VALUES ('Site', 'Administrator', $1, $2, 'admin', true)",
    )
    .bind(ADMIN_EMAIL)
    .bind(&hash)
    .execute(pool)
    .await?;

    println!("[done] Created admin account");
    Ok(())
}

async fn seed_customers(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let existing: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM customers WHERE role = 'user' ORDER BY created_at")
            .fetch_all(pool)
            .await?;
    if !existing.is_empty() {
        println!("[skip] Customers already exist ({})", existing.len());
        return Ok(existing);
    }

    let hash = hash_password(CUSTOMER_PASSWORD)?;
    let people = [
        ("Wanjiru", "Kamau", "wanjiru@example.com", "0712345678"),
        ("Otieno", "Ouma", "otieno@example.com", "0723456789"),
        ("Amina", "Hassan", "amina@example.com", "0734567890"),
        ("Kiprop", "Cheruiyot", "kiprop@example.com", "0110123456"),
    ];

    let mut ids = Vec::with_capacity(people.len());
    for (first, last, email, phone) in people {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO customers (first_name, last_name, email, password_hash, contact_phone, address, is_verified)
             VALUES ($1, $2, $3, $4, $5, 'Nairobi', true)
             RETURNING id",
        )
        .bind(first)
        .bind(last)
        .bind(email)
        .bind(&hash)
        .bind(phone)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created {} customers", ids.len());
    Ok(ids)
}

async fn seed_venues(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let existing: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM venues ORDER BY venue_name")
        .fetch_all(pool)
        .await?;
    if !existing.is_empty() {
        println!("[skip] Venues already exist ({})", existing.len());
        return Ok(existing);
    }

    let venues = [
        ("KICC Amphitheatre", "Harambee Avenue, Nairobi", 800, "0202000000"),
        ("Carnivore Grounds", "Langata Road, Nairobi", 5000, "0203000000"),
        ("Kasarani Stadium", "Thika Road, Nairobi", 60000, "0204000000"),
    ];

    let mut ids = Vec::with_capacity(venues.len());
    for (name, address, capacity, phone) in venues {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO venues (venue_name, address, capacity, contact_number)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(name)
        .bind(address)
        .bind(capacity)
        .bind(phone)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created {} venues", ids.len());
    Ok(ids)
}

/// Returns `(event id, ticket price)` pairs for active events.
async fn seed_events(pool: &PgPool, venues: &[Uuid]) -> anyhow::Result<Vec<(Uuid, Decimal)>> {
    let existing: Vec<(Uuid, Decimal)> =
        sqlx::query_as("SELECT id, ticket_price FROM events WHERE is_active = true")
            .fetch_all(pool)
            .await?;
    if !existing.is_empty() {
        println!("[skip] Events already exist ({})", existing.len());
        return Ok(existing);
    }

    let now = Utc::now();
    let events = [
        ("Nairobi Jazz Night", "Music", 14, Decimal::new(2500, 0), 300, true),
        ("Tech Summit Africa", "Conference", 30, Decimal::new(5000, 0), 1000, true),
        ("Rugby Sevens Final", "Sports", 45, Decimal::new(1500, 0), 20000, true),
        ("Comedy Store Live", "Comedy", 7, Decimal::new(1000, 0), 500, true),
        ("Last Season Gala", "Gala", -60, Decimal::new(8000, 0), 200, false),
    ];

    let mut active = Vec::new();
    for (i, (title, category, days_out, price, total, is_active)) in events.into_iter().enumerate() {
        let start = now + Duration::days(days_out);
        let venue = venues.get(i % venues.len().max(1)).copied();
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO events (title, description, category, event_date, start_time, end_time,
                ticket_price, available_tickets, total_tickets, is_active, venue_id)
             VALUES ($1, $2, $3, $4, $4, $5, $6, $7, $7, $8, $9)
             RETURNING id",
        )
        .bind(title)
        .bind(format!("{title}: sample event for local development"))
        .bind(category)
        .bind(start)
        .bind(start + Duration::hours(4))
        .bind(price)
        .bind(total)
        .bind(is_active)
        .bind(venue)
        .fetch_one(pool)
        .await?;
        if is_active {
            active.push((id, price));
        }
    }

    println!("[done] Created {} events", events.len());
    Ok(active)
}

async fn seed_bookings_and_payments(
    pool: &PgPool,
    customers: &[Uuid],
    events: &[(Uuid, Decimal)],
) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Bookings already exist ({count})");
        return Ok(());
    }
    if customers.is_empty() || events.is_empty() {
        println!("[skip] No customers or events to book");
        return Ok(());
    }

    let now = Utc::now();
    let statuses = ["Confirmed", "Confirmed", "Confirmed", "Pending", "Cancelled"];
    let payment_statuses = ["Completed", "Completed", "Pending", "Failed", "Refunded"];
    let mut bookings = 0;

    for day in 0..20i64 {
        let idx = day as usize;
        let customer = customers[idx % customers.len()];
        let (event, price) = events[idx % events.len()];
        let tickets = (day % 4 + 1) as i32;
        let amount = price * Decimal::from(tickets);
        let status = statuses[idx % statuses.len()];

        let booking_id: Uuid = sqlx::query_scalar(
            "INSERT INTO bookings (customer_id, event_id, number_of_tickets, total_amount, booking_date, booking_status)
             VALUES ($1, $2, $3, $4, $5, $6::booking_status)
             RETURNING id",
        )
        .bind(customer)
        .bind(event)
        .bind(tickets)
        .bind(amount)
        .bind(now - Duration::days(day))
        .bind(status)
        .fetch_one(pool)
        .await?;
        bookings += 1;

        if status != "Cancelled" {
            sqlx::query(
                "INSERT INTO payments (customer_id, booking_id, amount, payment_status, payment_method, transaction_id)
                 VALUES ($1, $2, $3, $4::payment_status, 'M-Pesa', $5)",
            )
            .bind(customer)
            .bind(booking_id)
            .bind(amount)
            .bind(payment_statuses[idx % payment_statuses.len()])
            .bind(format!("SEED{day:06}"))
            .execute(pool)
            .await?;
        }
    }

    println!("[done] Created {bookings} bookings with payments");
    Ok(())
}

async fn seed_support_tickets(pool: &PgPool, customers: &[Uuid]) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_support_tickets")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Support tickets already exist ({count})");
        return Ok(());
    }

    let tickets = [
        ("Refund request", "The event was postponed, I would like a refund.", "Open"),
        ("Ticket not received", "Payment went through but no ticket email arrived.", "In Progress"),
        ("Wrong seat category", "I booked VIP but received regular tickets.", "Resolved"),
    ];

    for (i, (subject, description, status)) in tickets.into_iter().enumerate() {
        let Some(customer) = customers.get(i % customers.len().max(1)) else {
            break;
        };
        sqlx::query(
            "INSERT INTO customer_support_tickets (customer_id, subject, description, status)
             VALUES ($1, $2, $3, $4::ticket_status)",
        )
        .bind(customer)
        .bind(subject)
        .bind(description)
        .bind(status)
        .execute(pool)
        .await?;
    }

    println!("[done] Created support tickets");
    Ok(())
}
