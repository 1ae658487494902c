pub mod auth;
pub mod promotions;
pub mod reservations;
pub mod schedules;
pub mod users;
pub mod workspaces;
