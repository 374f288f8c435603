use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::engine::BookingEngine;
use crate::handlers::{bookings, catalog, health_check};
use crate::utils::error::AppError;

/// Shared application state. The engine sits behind a single process-wide
/// lock: `book` and `cancel` take the write half so the capacity check and
/// the list append happen as one atomic unit, while quotes and reads share
/// the read half and observe a consistent snapshot. The guard is never held
/// across an await point.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<BookingEngine>>,
}

impl AppState {
    pub fn new(engine: BookingEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn engine(&self) -> Result<RwLockReadGuard<'_, BookingEngine>, AppError> {
        self.engine
            .read()
            .map_err(|_| AppError::Internal("Engine state lock poisoned".to_string()))
    }

    pub fn engine_mut(&self) -> Result<RwLockWriteGuard<'_, BookingEngine>, AppError> {
        self.engine
            .write()
            .map_err(|_| AppError::Internal("Engine state lock poisoned".to_string()))
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/catalog", get(catalog::get_catalog))
        .route("/quote", post(bookings::quote))
        .route("/availability", get(bookings::availability))
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/bookings/:booking_id", delete(bookings::cancel_booking))
        .route("/waitlist", get(bookings::list_waitlist))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
