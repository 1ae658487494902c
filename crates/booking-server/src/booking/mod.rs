//! Reservation and pricing rules.

pub mod pricing;
mod promotions;
mod reservations;
pub mod validator;

pub use pricing::PromotionConditionsNotMet;
pub use promotions::PromotionService;
pub use reservations::ReservationService;
pub use validator::ValidationError;
