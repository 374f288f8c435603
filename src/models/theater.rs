use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::movie::Movie;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theater {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub movies: Vec<Movie>,
}
