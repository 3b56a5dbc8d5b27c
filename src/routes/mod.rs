//! Route definitions for the ticketing API.

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod customers;
pub mod events;
pub mod health;
pub mod mpesa;
pub mod payments;
pub mod support_tickets;
pub mod venues;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Assemble every route with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify", post(auth::verify))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me));

    let customer_routes = Router::new()
        .route("/customers", get(customers::list))
        .route(
            "/customer/{id}",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/customer/{id}/ticket", get(support_tickets::list_by_customer));

    let venue_routes = Router::new()
        .route("/venue/register", post(venues::create))
        .route("/venues", get(venues::list))
        .route(
            "/venue/{id}",
            get(venues::get_by_id)
                .put(venues::update)
                .delete(venues::delete),
        )
        .route("/venues-event/{id}", get(venues::with_events));

    let event_routes = Router::new()
        .route("/event/register", post(events::create))
        .route("/events", get(events::list))
        .route(
            "/event/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        );

    let booking_routes = Router::new()
        .route("/booking/register", post(bookings::create))
        .route("/bookings", get(bookings::list))
        .route("/bookings/customer/{id}", get(bookings::list_by_customer))
        .route(
            "/booking/{id}",
            get(bookings::get_by_id)
                .put(bookings::update)
                .delete(bookings::delete),
        );

    let payment_routes = Router::new()
        .route("/payment/register", post(payments::create))
        .route("/payments", get(payments::list))
        .route("/payment/customer/{id}", get(payments::list_by_customer))
        .route(
            "/payment/{id}",
            get(payments::get_by_id)
                .put(payments::update)
                .delete(payments::delete),
        );

    let ticket_routes = Router::new()
        .route("/ticket/register", post(support_tickets::create))
        .route("/tickets", get(support_tickets::list))
        .route("/ticket/status/{status}", get(support_tickets::list_by_status))
        .route(
            "/ticket/{id}",
            get(support_tickets::get_by_id)
                .put(support_tickets::update_status)
                .delete(support_tickets::delete),
        );

    let mpesa_routes = Router::new()
        .route("/mpesa/stkpush", post(mpesa::stk_push))
        .route("/mpesa/callback", post(mpesa::callback));

    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/analytics", get(analytics::get_analytics))
        .merge(auth_routes)
        .merge(customer_routes)
        .merge(venue_routes)
        .merge(event_routes)
        .merge(booking_routes)
        .merge(payment_routes)
        .merge(ticket_routes)
        .merge(mpesa_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) if !frontend_url.is_empty() => cors.allow_origin(origin),
        _ => {
            tracing::warn!(frontend_url, "FRONTEND_URL unusable as CORS origin, allowing any");
            cors.allow_origin(Any)
        }
    }
}
