//! Business logic services.

pub mod analytics;
pub mod analytics_memory;
pub mod auth;
pub mod booking;
pub mod customer;
pub mod event;
pub mod mailer;
pub mod mpesa;
pub mod payment;
pub mod support_ticket;
pub mod venue;
