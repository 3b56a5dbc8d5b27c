pub mod booking;
pub mod customer;
pub mod event;
pub mod pagination;
pub mod payment;
pub mod support_ticket;
pub mod venue;
