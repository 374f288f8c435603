use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub theater_id: Uuid,
    pub movie_id: Uuid,
    pub screen_tier_id: String,
    pub food_item_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A booking request that arrived while the show was sold out. Same shape as
/// a confirmed booking; `created_at` is the submission time and decides who
/// is promoted first when a seat frees up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub theater_id: Uuid,
    pub movie_id: Uuid,
    pub screen_tier_id: String,
    pub food_item_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}
