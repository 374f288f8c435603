use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{BookingOutcome, CancellationOutcome};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub screen_tier_id: String,
    #[serde(default)]
    pub food_item_ids: Vec<String>,
}

#[derive(Serialize)]
struct QuotePayload {
    total: Decimal,
}

pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Response, AppError> {
    let engine = state.engine()?;
    let total = engine.quote_total(&request.screen_tier_id, &request.food_item_ids)?;

    Ok(success(QuotePayload { total }, "Quote calculated").into_response())
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub movie_id: Uuid,
    pub screen_tier_id: String,
}

#[derive(Serialize)]
struct AvailabilityPayload {
    sold_out: bool,
    seats_remaining: u32,
}

pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Response, AppError> {
    let engine = state.engine()?;
    let sold_out = engine.is_sold_out(query.movie_id, &query.screen_tier_id)?;
    let seats_remaining = engine.seats_remaining(query.movie_id, &query.screen_tier_id)?;

    let payload = AvailabilityPayload {
        sold_out,
        seats_remaining,
    };
    Ok(success(payload, "Availability retrieved").into_response())
}

#[derive(Deserialize)]
pub struct BookingRequest {
    pub theater_id: Uuid,
    pub movie_id: Uuid,
    pub screen_tier_id: String,
    #[serde(default)]
    pub food_item_ids: Vec<String>,
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Response, AppError> {
    let mut engine = state.engine_mut()?;
    let outcome = engine.book(
        request.theater_id,
        request.movie_id,
        &request.screen_tier_id,
        request.food_item_ids,
    )?;

    let message = match &outcome {
        BookingOutcome::Confirmed { booking_id, .. } => {
            format!("Booking confirmed! Booking ID: {}", booking_id)
        }
        BookingOutcome::Waitlisted { .. } => {
            "Show is sold out. You have been added to the waiting list.".to_string()
        }
    };

    Ok(success(outcome, message).into_response())
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut engine = state.engine_mut()?;
    let outcome = engine.cancel(booking_id)?;

    let message = match &outcome {
        CancellationOutcome::CancelledAndReassigned { .. } => {
            "Booking cancelled and allocated to waiting list customer"
        }
        CancellationOutcome::Cancelled { .. } => "Booking cancelled successfully",
    };

    Ok(success(outcome, message).into_response())
}

pub async fn list_bookings(State(state): State<AppState>) -> Result<Response, AppError> {
    let engine = state.engine()?;
    Ok(success(engine.bookings().to_vec(), "Confirmed bookings").into_response())
}

pub async fn list_waitlist(State(state): State<AppState>) -> Result<Response, AppError> {
    let engine = state.engine()?;
    Ok(success(engine.waitlist().to_vec(), "Waiting list").into_response())
}
