use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{FoodItem, Movie, ScreenTier, Theater};

/// Read-only reference data: which theaters screen which movies, the screen
/// tiers on offer, and the food menu. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub theaters: Vec<Theater>,
    pub screen_tiers: Vec<ScreenTier>,
    pub food_items: Vec<FoodItem>,
}

impl Catalog {
    pub fn theater(&self, id: Uuid) -> Option<&Theater> {
        self.theaters.iter().find(|t| t.id == id)
    }

    pub fn movie(&self, id: Uuid) -> Option<&Movie> {
        self.theaters
            .iter()
            .flat_map(|t| &t.movies)
            .find(|m| m.id == id)
    }

    pub fn screen_tier(&self, id: &str) -> Option<&ScreenTier> {
        self.screen_tiers.iter().find(|t| t.id == id)
    }

    pub fn food_item(&self, id: &str) -> Option<&FoodItem> {
        self.food_items.iter().find(|f| f.id == id)
    }

    /// Reference catalog served by default. Show times are offsets from the
    /// supplied base time so seeded screenings are always in the future.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            theaters: vec![
                Theater {
                    id: Uuid::new_v4(),
                    name: "PVR Cinemas".to_string(),
                    location: "Mumbai".to_string(),
                    movies: vec![
                        Movie {
                            id: Uuid::new_v4(),
                            title: "Inception".to_string(),
                            show_time: now + Duration::hours(3),
                        },
                        Movie {
                            id: Uuid::new_v4(),
                            title: "The Dark Knight".to_string(),
                            show_time: now + Duration::hours(6),
                        },
                    ],
                },
                Theater {
                    id: Uuid::new_v4(),
                    name: "INOX".to_string(),
                    location: "Delhi".to_string(),
                    movies: vec![
                        Movie {
                            id: Uuid::new_v4(),
                            title: "Interstellar".to_string(),
                            show_time: now + Duration::hours(27),
                        },
                        Movie {
                            id: Uuid::new_v4(),
                            title: "Dune".to_string(),
                            show_time: now + Duration::hours(30),
                        },
                    ],
                },
            ],
            screen_tiers: vec![
                ScreenTier {
                    id: "gold".to_string(),
                    name: "Gold".to_string(),
                    price: Decimal::new(400, 0),
                    capacity: 20,
                    food_discount: Decimal::new(10, 2),
                },
                ScreenTier {
                    id: "max".to_string(),
                    name: "Max".to_string(),
                    price: Decimal::new(300, 0),
                    capacity: 40,
                    food_discount: Decimal::new(5, 2),
                },
                ScreenTier {
                    id: "general".to_string(),
                    name: "General".to_string(),
                    price: Decimal::new(200, 0),
                    capacity: 100,
                    food_discount: Decimal::ZERO,
                },
            ],
            food_items: vec![
                FoodItem {
                    id: "popcorn".to_string(),
                    name: "Popcorn".to_string(),
                    price: Decimal::new(150, 0),
                },
                FoodItem {
                    id: "sandwich".to_string(),
                    name: "Sandwich".to_string(),
                    price: Decimal::new(100, 0),
                },
            ],
        }
    }
}
