use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Booking, Catalog, WaitlistEntry};
use crate::utils::error::AppError;

/// Cancellations are refused once the show starts in under this many minutes.
const CANCELLATION_CUTOFF_MINUTES: i64 = 30;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingOutcome {
    Confirmed { booking_id: Uuid, total: Decimal },
    Waitlisted { entry_id: Uuid },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CancellationOutcome {
    Cancelled {
        booking_id: Uuid,
    },
    CancelledAndReassigned {
        booking_id: Uuid,
        promoted_booking_id: Uuid,
    },
}

/// Owns the catalog plus the two mutable lists (confirmed bookings and the
/// waiting list). The engine itself is single-threaded; callers that serve
/// multiple clients wrap it in a lock so `book` and `cancel` run as one
/// atomic unit (see `routes::AppState`).
#[derive(Debug)]
pub struct BookingEngine {
    catalog: Catalog,
    bookings: Vec<Booking>,
    waitlist: Vec<WaitlistEntry>,
}

impl BookingEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            bookings: Vec::new(),
            waitlist: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn waitlist(&self) -> &[WaitlistEntry] {
        &self.waitlist
    }

    /// Price for one ticket of the given tier plus the given food items.
    /// The tier's food discount applies to the food subtotal only, never to
    /// the ticket itself. Duplicated food ids are each counted. The result
    /// is rounded to 2 decimal places with banker's rounding
    /// (`MidpointNearestEven`).
    pub fn quote_total(
        &self,
        screen_tier_id: &str,
        food_item_ids: &[String],
    ) -> Result<Decimal, AppError> {
        let tier = self.catalog.screen_tier(screen_tier_id).ok_or_else(|| {
            AppError::InvalidSelection(format!("Unknown screen tier '{}'", screen_tier_id))
        })?;

        let mut food_subtotal = Decimal::ZERO;
        for food_id in food_item_ids {
            let item = self.catalog.food_item(food_id).ok_or_else(|| {
                AppError::InvalidSelection(format!("Unknown food item '{}'", food_id))
            })?;
            food_subtotal += item.price;
        }

        let discounted_food = food_subtotal * (Decimal::ONE - tier.food_discount);
        let mut total = tier.price + discounted_food;
        total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        total.rescale(2);
        Ok(total)
    }

    pub fn is_sold_out(&self, movie_id: Uuid, screen_tier_id: &str) -> Result<bool, AppError> {
        let tier = self.catalog.screen_tier(screen_tier_id).ok_or_else(|| {
            AppError::InvalidSelection(format!("Unknown screen tier '{}'", screen_tier_id))
        })?;
        self.catalog
            .movie(movie_id)
            .ok_or_else(|| AppError::InvalidSelection(format!("Unknown movie '{}'", movie_id)))?;

        Ok(self.confirmed_count(movie_id, screen_tier_id) >= tier.capacity as usize)
    }

    pub fn seats_remaining(
        &self,
        movie_id: Uuid,
        screen_tier_id: &str,
    ) -> Result<u32, AppError> {
        let tier = self.catalog.screen_tier(screen_tier_id).ok_or_else(|| {
            AppError::InvalidSelection(format!("Unknown screen tier '{}'", screen_tier_id))
        })?;
        self.catalog
            .movie(movie_id)
            .ok_or_else(|| AppError::InvalidSelection(format!("Unknown movie '{}'", movie_id)))?;

        let taken = self.confirmed_count(movie_id, screen_tier_id) as u32;
        Ok(tier.capacity.saturating_sub(taken))
    }

    /// Book a seat, or join the waiting list when the show is sold out.
    /// Exactly one of the two lists grows by one entry.
    pub fn book(
        &mut self,
        theater_id: Uuid,
        movie_id: Uuid,
        screen_tier_id: &str,
        food_item_ids: Vec<String>,
    ) -> Result<BookingOutcome, AppError> {
        let theater = self.catalog.theater(theater_id).ok_or_else(|| {
            AppError::InvalidSelection(format!("Unknown theater '{}'", theater_id))
        })?;
        theater
            .movies
            .iter()
            .find(|m| m.id == movie_id)
            .ok_or_else(|| {
                AppError::InvalidSelection(format!(
                    "Movie '{}' is not showing at {}",
                    movie_id, theater.name
                ))
            })?;

        // Validates the tier and every food id before any state changes.
        let total = self.quote_total(screen_tier_id, &food_item_ids)?;

        if self.is_sold_out(movie_id, screen_tier_id)? {
            let entry = WaitlistEntry {
                id: Uuid::new_v4(),
                theater_id,
                movie_id,
                screen_tier_id: screen_tier_id.to_string(),
                food_item_ids,
                created_at: Utc::now(),
            };
            let entry_id = entry.id;
            self.waitlist.push(entry);
            info!(
                entry_id = %entry_id,
                movie_id = %movie_id,
                screen_tier_id,
                "Show sold out, request added to waiting list"
            );
            return Ok(BookingOutcome::Waitlisted { entry_id });
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            theater_id,
            movie_id,
            screen_tier_id: screen_tier_id.to_string(),
            food_item_ids,
            created_at: Utc::now(),
        };
        let booking_id = booking.id;
        self.bookings.push(booking);
        info!(
            booking_id = %booking_id,
            movie_id = %movie_id,
            screen_tier_id,
            total = %total,
            "Booking confirmed"
        );
        Ok(BookingOutcome::Confirmed { booking_id, total })
    }

    /// Cancel a confirmed booking, promoting the longest-waiting matching
    /// waitlist entry into the freed seat.
    pub fn cancel(&mut self, booking_id: Uuid) -> Result<CancellationOutcome, AppError> {
        self.cancel_at(booking_id, Utc::now())
    }

    /// `cancel` with an explicit clock, so the 30-minute rule is testable.
    pub fn cancel_at(
        &mut self,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CancellationOutcome, AppError> {
        let position = self
            .bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("No confirmed booking with id '{}'", booking_id))
            })?;

        let movie_id = self.bookings[position].movie_id;
        let tier_id = self.bookings[position].screen_tier_id.clone();
        let show_time = self
            .catalog
            .movie(movie_id)
            .map(|m| m.show_time)
            .ok_or_else(|| {
                AppError::NotFound(format!("Movie '{}' is not in the catalog", movie_id))
            })?;
        let capacity = self
            .catalog
            .screen_tier(&tier_id)
            .map(|t| t.capacity)
            .ok_or_else(|| {
                AppError::NotFound(format!("Screen tier '{}' is not in the catalog", tier_id))
            })?;

        // num_minutes truncates toward zero, so 29m59s left reads as 29 and
        // is refused while exactly 30m00s is still allowed.
        let minutes_until_show = (show_time - now).num_minutes();
        if minutes_until_show < CANCELLATION_CUTOFF_MINUTES {
            return Err(AppError::TooLateToCancel(
                "Cannot cancel booking less than 30 minutes before show time".to_string(),
            ));
        }

        self.bookings.remove(position);
        info!(booking_id = %booking_id, movie_id = %movie_id, "Booking cancelled");

        // Promote the earliest-submitted matching entry; equal timestamps
        // fall back to insertion order since `min_by_key` keeps the first.
        let candidate = self
            .waitlist
            .iter()
            .enumerate()
            .filter(|(_, w)| w.movie_id == movie_id && w.screen_tier_id == tier_id)
            .min_by_key(|(_, w)| w.created_at)
            .map(|(index, _)| index);

        if let Some(index) = candidate {
            // Capacity is re-checked at promotion time rather than assumed
            // from the slot just freed.
            if (self.confirmed_count(movie_id, &tier_id) as u32) < capacity {
                let entry = self.waitlist.remove(index);
                let entry_id = entry.id;
                let promoted = Booking {
                    id: Uuid::new_v4(),
                    theater_id: entry.theater_id,
                    movie_id: entry.movie_id,
                    screen_tier_id: entry.screen_tier_id,
                    food_item_ids: entry.food_item_ids,
                    created_at: now,
                };
                let promoted_booking_id = promoted.id;
                self.bookings.push(promoted);
                info!(
                    promoted_booking_id = %promoted_booking_id,
                    waitlist_entry_id = %entry_id,
                    movie_id = %movie_id,
                    "Waiting list entry promoted to confirmed booking"
                );
                return Ok(CancellationOutcome::CancelledAndReassigned {
                    booking_id,
                    promoted_booking_id,
                });
            }
        }

        Ok(CancellationOutcome::Cancelled { booking_id })
    }

    fn confirmed_count(&self, movie_id: Uuid, screen_tier_id: &str) -> usize {
        self.bookings
            .iter()
            .filter(|b| b.movie_id == movie_id && b.screen_tier_id == screen_tier_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, Movie, ScreenTier, Theater};
    use chrono::Duration;

    // One theater, one movie, one tier with a small capacity so capacity
    // edges are cheap to reach.
    fn tiny_catalog(now: DateTime<Utc>, show_in_minutes: i64, capacity: u32) -> Catalog {
        Catalog {
            theaters: vec![Theater {
                id: Uuid::new_v4(),
                name: "Galaxy".to_string(),
                location: "Pune".to_string(),
                movies: vec![Movie {
                    id: Uuid::new_v4(),
                    title: "Arrival".to_string(),
                    show_time: now + Duration::minutes(show_in_minutes),
                }],
            }],
            screen_tiers: vec![ScreenTier {
                id: "vip".to_string(),
                name: "VIP".to_string(),
                price: Decimal::new(500, 0),
                capacity,
                food_discount: Decimal::new(10, 2),
            }],
            food_items: vec![FoodItem {
                id: "popcorn".to_string(),
                name: "Popcorn".to_string(),
                price: Decimal::new(150, 0),
            }],
        }
    }

    fn tiny_engine(now: DateTime<Utc>, show_in_minutes: i64, capacity: u32) -> BookingEngine {
        BookingEngine::new(tiny_catalog(now, show_in_minutes, capacity))
    }

    fn ids(engine: &BookingEngine) -> (Uuid, Uuid) {
        let theater = &engine.catalog().theaters[0];
        (theater.id, theater.movies[0].id)
    }

    fn book_one(engine: &mut BookingEngine, food: &[&str]) -> BookingOutcome {
        let (theater_id, movie_id) = ids(engine);
        engine
            .book(
                theater_id,
                movie_id,
                "vip",
                food.iter().map(|f| f.to_string()).collect(),
            )
            .unwrap()
    }

    #[test]
    fn quote_general_with_popcorn() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        let total = engine
            .quote_total("general", &["popcorn".to_string()])
            .unwrap();
        assert_eq!(total.to_string(), "350.00");
    }

    #[test]
    fn quote_gold_discounts_food_but_not_ticket() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        // 400 + (150 + 100) * 0.90 = 625
        let total = engine
            .quote_total("gold", &["popcorn".to_string(), "sandwich".to_string()])
            .unwrap();
        assert_eq!(total.to_string(), "625.00");
    }

    #[test]
    fn quote_is_deterministic() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));
        let food = vec!["popcorn".to_string(), "sandwich".to_string()];

        let first = engine.quote_total("max", &food).unwrap();
        let second = engine.quote_total("max", &food).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn quote_counts_duplicate_food_items() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        // 200 + 150 * 2, no discount on the general tier
        let total = engine
            .quote_total("general", &["popcorn".to_string(), "popcorn".to_string()])
            .unwrap();
        assert_eq!(total.to_string(), "500.00");
    }

    #[test]
    fn quote_rejects_unknown_tier() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        let err = engine.quote_total("imax", &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn quote_rejects_unknown_food_item() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        let err = engine
            .quote_total("gold", &["nachos".to_string()])
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn booking_fills_to_capacity_then_waitlists() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 120, 3);
        let (_, movie_id) = ids(&engine);

        for _ in 0..3 {
            assert!(matches!(
                book_one(&mut engine, &[]),
                BookingOutcome::Confirmed { .. }
            ));
        }
        assert!(engine.is_sold_out(movie_id, "vip").unwrap());
        assert_eq!(engine.seats_remaining(movie_id, "vip").unwrap(), 0);

        let overflow = book_one(&mut engine, &[]);
        assert!(matches!(overflow, BookingOutcome::Waitlisted { .. }));
        assert_eq!(engine.bookings().len(), 3);
        assert_eq!(engine.waitlist().len(), 1);
    }

    #[test]
    fn seats_remaining_decreases_per_booking() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 120, 2);
        let (_, movie_id) = ids(&engine);

        assert_eq!(engine.seats_remaining(movie_id, "vip").unwrap(), 2);
        book_one(&mut engine, &[]);
        assert_eq!(engine.seats_remaining(movie_id, "vip").unwrap(), 1);
        book_one(&mut engine, &[]);
        assert_eq!(engine.seats_remaining(movie_id, "vip").unwrap(), 0);
        assert!(engine.is_sold_out(movie_id, "vip").unwrap());
    }

    #[test]
    fn book_rejects_unknown_theater() {
        let mut engine = tiny_engine(Utc::now(), 120, 2);
        let (_, movie_id) = ids(&engine);

        let err = engine
            .book(Uuid::new_v4(), movie_id, "vip", Vec::new())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn book_rejects_movie_not_at_that_theater() {
        let mut engine = BookingEngine::new(Catalog::seed(Utc::now()));
        let theater_id = engine.catalog().theaters[0].id;
        let foreign_movie_id = engine.catalog().theaters[1].movies[0].id;

        let err = engine
            .book(theater_id, foreign_movie_id, "gold", Vec::new())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn book_rejects_unknown_food_without_state_change() {
        let mut engine = tiny_engine(Utc::now(), 120, 2);
        let (theater_id, movie_id) = ids(&engine);

        let err = engine
            .book(theater_id, movie_id, "vip", vec!["nachos".to_string()])
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
        assert!(engine.bookings().is_empty());
        assert!(engine.waitlist().is_empty());
    }

    #[test]
    fn cancel_45_minutes_before_show_succeeds() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 45, 2);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        let outcome = engine.cancel_at(booking_id, now).unwrap();
        assert!(matches!(outcome, CancellationOutcome::Cancelled { .. }));
        assert!(engine.bookings().is_empty());
    }

    #[test]
    fn cancel_20_minutes_before_show_is_refused() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 20, 2);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        let err = engine.cancel_at(booking_id, now).unwrap_err();
        assert!(matches!(err, AppError::TooLateToCancel(_)));
        assert_eq!(engine.bookings().len(), 1);
    }

    #[test]
    fn cancel_exactly_30_minutes_before_show_succeeds() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 30, 2);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        assert!(engine.cancel_at(booking_id, now).is_ok());
    }

    #[test]
    fn cancel_twice_reports_not_found() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 120, 2);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        engine.cancel_at(booking_id, now).unwrap();
        let err = engine.cancel_at(booking_id, now).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn cancel_promotes_earliest_waitlisted_request() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 120, 1);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        // Two overflow requests, distinguishable by their food orders.
        let first_entry_id = match book_one(&mut engine, &["popcorn"]) {
            BookingOutcome::Waitlisted { entry_id } => entry_id,
            other => panic!("expected waitlisting, got {:?}", other),
        };
        let second_entry_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Waitlisted { entry_id } => entry_id,
            other => panic!("expected waitlisting, got {:?}", other),
        };

        let outcome = engine.cancel_at(booking_id, now).unwrap();
        let promoted_booking_id = match outcome {
            CancellationOutcome::CancelledAndReassigned {
                promoted_booking_id,
                ..
            } => promoted_booking_id,
            other => panic!("expected reassignment, got {:?}", other),
        };

        // The confirmed count is unchanged and the promoted booking is the
        // first-submitted request under a brand-new id.
        assert_eq!(engine.bookings().len(), 1);
        assert_eq!(engine.waitlist().len(), 1);
        let promoted = &engine.bookings()[0];
        assert_eq!(promoted.id, promoted_booking_id);
        assert_ne!(promoted.id, first_entry_id);
        assert_eq!(promoted.food_item_ids, vec!["popcorn".to_string()]);
        assert_eq!(engine.waitlist()[0].id, second_entry_id);
    }

    #[test]
    fn cancel_without_matching_waitlist_just_removes() {
        let now = Utc::now();
        let mut engine = tiny_engine(now, 120, 2);

        let booking_id = match book_one(&mut engine, &[]) {
            BookingOutcome::Confirmed { booking_id, .. } => booking_id,
            other => panic!("expected confirmation, got {:?}", other),
        };

        let outcome = engine.cancel_at(booking_id, now).unwrap();
        assert!(matches!(outcome, CancellationOutcome::Cancelled { .. }));
        assert!(engine.bookings().is_empty());
        assert!(engine.waitlist().is_empty());
    }

    #[test]
    fn is_sold_out_rejects_unknown_movie() {
        let engine = BookingEngine::new(Catalog::seed(Utc::now()));

        let err = engine.is_sold_out(Uuid::new_v4(), "gold").unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }
}
