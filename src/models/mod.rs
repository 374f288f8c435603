pub mod booking;
pub mod catalog;
pub mod food_item;
pub mod movie;
pub mod screen_tier;
pub mod theater;

pub use booking::{Booking, WaitlistEntry};
pub use catalog::Catalog;
pub use food_item::FoodItem;
pub use movie::Movie;
pub use screen_tier::ScreenTier;
pub use theater::Theater;
