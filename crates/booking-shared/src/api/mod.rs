mod auth;
mod catalog;
mod promotions;
mod reservations;

pub use auth::*;
pub use catalog::*;
pub use promotions::*;
pub use reservations::*;
