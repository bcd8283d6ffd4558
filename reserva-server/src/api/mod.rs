//! HTTP API routes

pub mod auth;
pub mod health;
pub mod reservations;
pub mod restaurants;
pub mod ws;

use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware};
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes: auth, restaurant directory, availability, live feed
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/restaurant-login", post(auth::restaurant_login))
        .route("/api/restaurants", get(restaurants::list))
        .route("/api/restaurants/{id}", get(restaurants::get_restaurant))
        .route(
            "/api/restaurants/{id}/availability",
            get(restaurants::availability),
        )
        .route("/api/ws", get(ws::handle_ws));

    // Session routes: customer booking API and the staff dashboard
    let protected = Router::new()
        .route(
            "/api/reservations",
            post(reservations::create).get(reservations::list_mine),
        )
        .route("/api/reservations/{id}", delete(reservations::cancel))
        .route(
            "/api/restaurants/reservations",
            get(restaurants::list_reservations),
        )
        .route(
            "/api/restaurants/reservations/{id}/confirm-presence",
            patch(restaurants::confirm_presence),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(ConcurrencyLimitLayer::new(256))
        .with_state(state)
}
