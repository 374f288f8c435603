use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenTier {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub capacity: u32,
    /// Fraction of the food subtotal waived for this tier, in the range 0-1.
    pub food_discount: Decimal,
}
