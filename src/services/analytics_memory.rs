//! In-memory [`AnalyticsStore`] for tests and local demos.
//!
//! Holds just the columns the analytics queries read and reproduces their
//! filters, groupings and orderings in plain Rust.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::booking::BookingStatus;
use crate::models::payment::PaymentStatus;
use crate::services::analytics::{
    AnalyticsStore, BookingWindow, CustomerSpendRow, DailyBookingsRow, EventRevenueRow,
    EventTicketsRow, PaymentStatusRow, TopN,
};

#[derive(Debug, Clone)]
struct CustomerRecord {
    id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Clone)]
struct EventRecord {
    id: Uuid,
    title: String,
    is_active: bool,
    venue_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
struct BookingRecord {
    customer_id: Uuid,
    event_id: Uuid,
    number_of_tickets: i32,
    total_amount: Decimal,
    status: BookingStatus,
    booking_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PaymentRecord {
    amount: Decimal,
    status: Option<PaymentStatus>,
}

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<CustomerRecord>,
    venues: HashMap<Uuid, String>,
    events: Vec<EventRecord>,
    bookings: Vec<BookingRecord>,
    payments: Vec<PaymentRecord>,
    failure: Option<String>,
}

impl Tables {
    fn check(&self) -> Result<(), AppError> {
        match &self.failure {
            Some(msg) => Err(AppError::Internal(msg.clone())),
            None => Ok(()),
        }
    }

    fn confirmed(&self) -> impl Iterator<Item = &BookingRecord> {
        self.bookings
            .iter()
            .filter(|b| b.status.counts_as_revenue())
    }

    fn active_events(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(|e| e.is_active)
    }
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnalyticsStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(&self, first_name: &str, last_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().await.customers.push(CustomerRecord {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        id
    }

    pub async fn add_venue(&self, venue_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .write()
            .await
            .venues
            .insert(id, venue_name.to_string());
        id
    }

    pub async fn add_event(&self, title: &str, is_active: bool, venue_id: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.write().await.events.push(EventRecord {
            id,
            title: title.to_string(),
            is_active,
            venue_id,
        });
        id
    }

    pub async fn add_booking(
        &self,
        customer_id: Uuid,
        event_id: Uuid,
        number_of_tickets: i32,
        total_amount: Decimal,
        status: BookingStatus,
        booking_date: DateTime<Utc>,
    ) {
        self.tables.write().await.bookings.push(BookingRecord {
            customer_id,
            event_id,
            number_of_tickets,
            total_amount,
            status,
            booking_date,
        });
    }

    pub async fn add_payment(&self, amount: Decimal, status: Option<PaymentStatus>) {
        self.tables
            .write()
            .await
            .payments
            .push(PaymentRecord { amount, status });
    }

    /// Make every subsequent query fail with `message`.
    pub async fn fail_with(&self, message: &str) {
        self.tables.write().await.failure = Some(message.to_string());
    }
}

#[async_trait]
impl AnalyticsStore for InMemoryAnalyticsStore {
    async fn count_active_events(&self) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables.active_events().count() as i64)
    }

    async fn count_bookings(&self) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables.bookings.len() as i64)
    }

    async fn confirmed_revenue(&self) -> Result<Decimal, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables.confirmed().map(|b| b.total_amount).sum())
    }

    async fn count_customers(&self) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables.customers.len() as i64)
    }

    async fn tickets_sold_per_event(&self, top: TopN) -> Result<Vec<EventTicketsRow>, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;

        let mut rows: Vec<EventTicketsRow> = tables
            .active_events()
            .map(|event| EventTicketsRow {
                event_id: event.id,
                event_name: event.title.clone(),
                tickets_sold: tables
                    .confirmed()
                    .filter(|b| b.event_id == event.id)
                    .map(|b| i64::from(b.number_of_tickets))
                    .sum(),
                venue_name: event.venue_id.and_then(|v| tables.venues.get(&v).cloned()),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.tickets_sold
                .cmp(&a.tickets_sold)
                .then_with(|| a.event_name.cmp(&b.event_name))
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        rows.truncate(limit(top));
        Ok(rows)
    }

    async fn revenue_per_event(&self, top: TopN) -> Result<Vec<EventRevenueRow>, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;

        let mut rows: Vec<(Uuid, EventRevenueRow)> = tables
            .active_events()
            .map(|event| {
                let revenue: Decimal = tables
                    .confirmed()
                    .filter(|b| b.event_id == event.id)
                    .map(|b| b.total_amount)
                    .sum();
                (
                    event.id,
                    EventRevenueRow {
                        event_name: event.title.clone(),
                        revenue,
                    },
                )
            })
            .filter(|(_, row)| row.revenue > Decimal::ZERO)
            .collect();

        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.event_name.cmp(&b.event_name))
                .then_with(|| a_id.cmp(b_id))
        });
        rows.truncate(limit(top));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn bookings_per_day(
        &self,
        window: BookingWindow,
    ) -> Result<Vec<DailyBookingsRow>, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;

        let mut days: BTreeMap<NaiveDate, (i64, Decimal)> = BTreeMap::new();
        for booking in tables
            .confirmed()
            .filter(|b| window.contains(b.booking_date))
        {
            let entry = days
                .entry(booking.booking_date.date_naive())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += booking.total_amount;
        }

        Ok(days
            .into_iter()
            .map(|(day, (bookings, revenue))| DailyBookingsRow {
                day,
                bookings,
                revenue,
            })
            .collect())
    }

    async fn payment_status_groups(&self) -> Result<Vec<PaymentStatusRow>, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;

        let mut groups: HashMap<Option<PaymentStatus>, (i64, Decimal)> = HashMap::new();
        for payment in &tables.payments {
            let entry = groups.entry(payment.status).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += payment.amount;
        }

        let mut rows: Vec<PaymentStatusRow> = groups
            .into_iter()
            .map(|(status, (count, amount))| PaymentStatusRow {
                status,
                count,
                amount,
            })
            .collect();
        rows.sort_by_key(|r| (Reverse(r.count), r.status.is_none(), r.status));
        Ok(rows)
    }

    async fn top_customers(&self, top: TopN) -> Result<Vec<CustomerSpendRow>, AppError> {
        let tables = self.tables.read().await;
        tables.check()?;

        let mut rows: Vec<(Uuid, CustomerSpendRow)> = tables
            .customers
            .iter()
            .filter_map(|customer| {
                let mut bookings = tables
                    .confirmed()
                    .filter(|b| b.customer_id == customer.id)
                    .peekable();
                bookings.peek()?;
                let (count, spent) = bookings
                    .fold((0i64, Decimal::ZERO), |(n, sum), b| (n + 1, sum + b.total_amount));
                Some((
                    customer.id,
                    CustomerSpendRow {
                        first_name: customer.first_name.clone(),
                        last_name: customer.last_name.clone(),
                        total_bookings: count,
                        total_spent: spent,
                    },
                ))
            })
            .collect();

        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| b.total_bookings.cmp(&a.total_bookings))
                .then_with(|| a_id.cmp(b_id))
        });
        rows.truncate(limit(top));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }
}

fn limit(top: TopN) -> usize {
    usize::try_from(top.limit).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn customers_without_confirmed_bookings_are_not_ranked() {
        let store = InMemoryAnalyticsStore::new();
        let event = store.add_event("Comedy", true, None).await;
        let buyer = store.add_customer("Faith", "Chebet").await;
        let browser = store.add_customer("Gideon", "Kiprop").await;
        store
            .add_booking(buyer, event, 1, Decimal::new(1000, 0), BookingStatus::Confirmed, Utc::now())
            .await;
        store
            .add_booking(browser, event, 1, Decimal::new(1000, 0), BookingStatus::Pending, Utc::now())
            .await;

        let rows = store.top_customers(TopN { limit: 10 }).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name, "Faith");
        assert_eq!(store.count_customers().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn dangling_venue_reference_has_no_name() {
        let store = InMemoryAnalyticsStore::new();
        store.add_event("Pop-up", true, Some(Uuid::new_v4())).await;

        let rows = store
            .tickets_sold_per_event(TopN { limit: 10 })
            .await
            .unwrap();
        assert_eq!(rows[0].venue_name, None);
    }

    #[tokio::test]
    async fn zero_limit_returns_nothing() {
        let store = InMemoryAnalyticsStore::new();
        store.add_event("Any", true, None).await;
        let rows = store
            .tickets_sold_per_event(TopN { limit: 0 })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
