//! Admin analytics: KPIs, per-event sales, revenue share, daily bookings,
//! payment outcomes and top customers.
//!
//! Every figure is read through an [`AnalyticsStore`], so the aggregation can
//! run against PostgreSQL in production and an in-memory fake in tests.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::payment::PaymentStatus;

/// Events listed in `ticketsPerEvent`.
pub const TOP_EVENTS_BY_TICKETS: i64 = 10;
/// Events listed in `revenueDistribution`.
pub const TOP_EVENTS_BY_REVENUE: i64 = 8;
/// Customers listed in `topCustomers`.
pub const TOP_CUSTOMERS: i64 = 10;
/// Length of the `bookingsOverTime` window.
pub const BOOKINGS_WINDOW_DAYS: i64 = 30;

const UNKNOWN_VENUE: &str = "Unknown Venue";
const UNKNOWN_STATUS: &str = "Unknown";

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub kpis: Kpis,
    pub tickets_per_event: Vec<EventTickets>,
    pub revenue_distribution: Vec<RevenueShare>,
    pub bookings_over_time: Vec<DailyBookings>,
    pub payment_status_breakdown: Vec<PaymentStatusSummary>,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_events: i64,
    pub total_bookings: i64,
    pub total_revenue: f64,
    pub total_customers: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTickets {
    pub event_name: String,
    #[serde(rename = "eventID")]
    pub event_id: Uuid,
    pub tickets_sold: i64,
    pub venue: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueShare {
    pub event_name: String,
    pub revenue: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyBookings {
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub bookings: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentStatusSummary {
    pub status: String,
    pub count: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub customer_name: String,
    pub total_bookings: i64,
    pub total_spent: f64,
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Row limit for ranked sub-queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN {
    pub limit: i64,
}

/// Inclusive booking-date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl BookingWindow {
    /// The `days` days ending at `now`.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            since: now - Duration::days(days),
            until: now,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since <= at && at <= self.until
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EventTicketsRow {
    pub event_id: Uuid,
    pub event_name: String,
    pub tickets_sold: i64,
    pub venue_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EventRevenueRow {
    pub event_name: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DailyBookingsRow {
    pub day: NaiveDate,
    pub bookings: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PaymentStatusRow {
    pub status: Option<PaymentStatus>,
    pub count: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CustomerSpendRow {
    pub first_name: String,
    pub last_name: String,
    pub total_bookings: i64,
    pub total_spent: Decimal,
}

/// Read-only queries behind the analytics report.
///
/// Revenue always means the sum of `total_amount` over bookings whose status
/// is `Confirmed`; sums over no rows are zero.
#[async_trait]
pub trait AnalyticsStore: Send + Sync + Debug {
    /// Events with the active flag set.
    async fn count_active_events(&self) -> Result<i64, AppError>;

    /// All bookings, any status.
    async fn count_bookings(&self) -> Result<i64, AppError>;

    async fn confirmed_revenue(&self) -> Result<Decimal, AppError>;

    async fn count_customers(&self) -> Result<i64, AppError>;

    /// Confirmed tickets per active event, zero-sale events included,
    /// best sellers first.
    async fn tickets_sold_per_event(&self, top: TopN) -> Result<Vec<EventTicketsRow>, AppError>;

    /// Confirmed revenue per active event, events without revenue excluded,
    /// highest first.
    async fn revenue_per_event(&self, top: TopN) -> Result<Vec<EventRevenueRow>, AppError>;

    /// Confirmed bookings inside `window`, grouped by UTC day, oldest first.
    async fn bookings_per_day(&self, window: BookingWindow)
        -> Result<Vec<DailyBookingsRow>, AppError>;

    /// Payments grouped by status (null kept as its own group), largest group first.
    async fn payment_status_groups(&self) -> Result<Vec<PaymentStatusRow>, AppError>;

    /// Customers with at least one confirmed booking, biggest spenders first.
    async fn top_customers(&self, top: TopN) -> Result<Vec<CustomerSpendRow>, AppError>;
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the full report. Sub-queries run concurrently; the first failure
/// aborts the whole report.
pub async fn compute_analytics(store: &dyn AnalyticsStore) -> Result<AnalyticsReport, AppError> {
    compute_analytics_at(store, Utc::now()).await
}

/// [`compute_analytics`] with an explicit clock.
pub async fn compute_analytics_at(
    store: &dyn AnalyticsStore,
    now: DateTime<Utc>,
) -> Result<AnalyticsReport, AppError> {
    let window = BookingWindow::trailing_days(now, BOOKINGS_WINDOW_DAYS);

    let (
        total_events,
        total_bookings,
        total_revenue,
        total_customers,
        tickets,
        revenue,
        daily,
        payments,
        customers,
    ) = tokio::try_join!(
        store.count_active_events(),
        store.count_bookings(),
        store.confirmed_revenue(),
        store.count_customers(),
        store.tickets_sold_per_event(TopN { limit: TOP_EVENTS_BY_TICKETS }),
        store.revenue_per_event(TopN { limit: TOP_EVENTS_BY_REVENUE }),
        store.bookings_per_day(window),
        store.payment_status_groups(),
        store.top_customers(TopN { limit: TOP_CUSTOMERS }),
    )
    .inspect_err(|e| tracing::error!(error = %e, "Analytics computation failed"))?;

    let report = AnalyticsReport {
        kpis: Kpis {
            total_events,
            total_bookings,
            total_revenue: to_number(total_revenue),
            total_customers,
        },
        tickets_per_event: tickets
            .into_iter()
            .map(|row| EventTickets {
                event_name: row.event_name,
                event_id: row.event_id,
                tickets_sold: row.tickets_sold,
                venue: row.venue_name.unwrap_or_else(|| UNKNOWN_VENUE.to_string()),
            })
            .collect(),
        revenue_distribution: revenue
            .into_iter()
            .map(|row| RevenueShare {
                percentage: to_number(percentage_of(row.revenue, total_revenue)),
                revenue: to_number(row.revenue),
                event_name: row.event_name,
            })
            .collect(),
        bookings_over_time: daily
            .into_iter()
            .map(|row| DailyBookings {
                date: row.day.format("%Y-%m-%d").to_string(),
                bookings: row.bookings,
                revenue: to_number(row.revenue),
            })
            .collect(),
        payment_status_breakdown: payments
            .into_iter()
            .map(|row| PaymentStatusSummary {
                status: row
                    .status
                    .map_or(UNKNOWN_STATUS, |s| s.as_str())
                    .to_string(),
                count: row.count,
                amount: to_number(row.amount),
            })
            .collect(),
        top_customers: customers
            .into_iter()
            .map(|row| TopCustomer {
                customer_name: format!("{} {}", row.first_name, row.last_name),
                total_bookings: row.total_bookings,
                total_spent: to_number(row.total_spent),
            })
            .collect(),
    };

    tracing::debug!(
        total_events = report.kpis.total_events,
        total_bookings = report.kpis.total_bookings,
        "Analytics computed"
    );
    Ok(report)
}

/// `part / total * 100`, or zero when there is no total.
fn percentage_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn to_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// PostgreSQL store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgAnalyticsStore {
    pool: PgPool,
}

impl PgAnalyticsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn count_active_events(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE is_active = true")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_bookings(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn confirmed_revenue(&self) -> Result<Decimal, AppError> {
        let revenue = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM bookings
            WHERE booking_status = 'Confirmed'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(revenue)
    }

    async fn count_customers(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn tickets_sold_per_event(&self, top: TopN) -> Result<Vec<EventTicketsRow>, AppError> {
        let rows = sqlx::query_as::<_, EventTicketsRow>(
            r#"
            SELECT
                e.id AS event_id,
                e.title AS event_name,
                COALESCE(SUM(b.number_of_tickets), 0)::BIGINT AS tickets_sold,
                v.venue_name
            FROM events e
            LEFT JOIN venues v ON v.id = e.venue_id
            LEFT JOIN bookings b ON b.event_id = e.id AND b.booking_status = 'Confirmed'
            WHERE e.is_active = true
            GROUP BY e.id, e.title, v.venue_name
            ORDER BY tickets_sold DESC, e.title ASC, e.id ASC
            LIMIT $1
            "#,
        )
        .bind(top.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn revenue_per_event(&self, top: TopN) -> Result<Vec<EventRevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, EventRevenueRow>(
            r#"
            SELECT
                e.title AS event_name,
                COALESCE(SUM(b.total_amount), 0) AS revenue
            FROM events e
            LEFT JOIN bookings b ON b.event_id = e.id AND b.booking_status = 'Confirmed'
            WHERE e.is_active = true
            GROUP BY e.id, e.title
            HAVING COALESCE(SUM(b.total_amount), 0) > 0
            ORDER BY revenue DESC, e.title ASC, e.id ASC
            LIMIT $1
            "#,
        )
        .bind(top.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn bookings_per_day(
        &self,
        window: BookingWindow,
    ) -> Result<Vec<DailyBookingsRow>, AppError> {
        let rows = sqlx::query_as::<_, DailyBookingsRow>(
            r#"
            SELECT
                (booking_date AT TIME ZONE 'UTC')::DATE AS day,
                COUNT(*) AS bookings,
                COALESCE(SUM(total_amount), 0) AS revenue
            FROM bookings
            WHERE booking_status = 'Confirmed'
              AND booking_date >= $1
              AND booking_date <= $2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(window.since)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn payment_status_groups(&self) -> Result<Vec<PaymentStatusRow>, AppError> {
        let rows = sqlx::query_as::<_, PaymentStatusRow>(
            r#"
            SELECT
                payment_status AS status,
                COUNT(*) AS count,
                COALESCE(SUM(amount), 0) AS amount
            FROM payments
            GROUP BY payment_status
            ORDER BY count DESC, status ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn top_customers(&self, top: TopN) -> Result<Vec<CustomerSpendRow>, AppError> {
        let rows = sqlx::query_as::<_, CustomerSpendRow>(
            r#"
            SELECT
                c.first_name,
                c.last_name,
                COUNT(b.id) AS total_bookings,
                COALESCE(SUM(b.total_amount), 0) AS total_spent
            FROM customers c
            INNER JOIN bookings b ON b.customer_id = c.id
            WHERE b.booking_status = 'Confirmed'
            GROUP BY c.id, c.first_name, c.last_name
            ORDER BY total_spent DESC, total_bookings DESC, c.id ASC
            LIMIT $1
            "#,
        )
        .bind(top.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
