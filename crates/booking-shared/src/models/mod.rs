mod person;
mod promotion;
mod reservation;
mod schedule;
mod workspace;

pub use person::*;
pub use promotion::*;
pub use reservation::*;
pub use schedule::*;
pub use workspace::*;
