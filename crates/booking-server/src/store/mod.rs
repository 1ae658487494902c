//! Persistence seam for the catalog, reservations and promotions.
//!
//! Handlers and the booking services only ever see `Arc<dyn Store>`; `main`
//! decides which implementation backs it.

use async_trait::async_trait;
use booking_shared::{
    Person, Promotion, PromotionStatus, Reservation, ReservationStatus, Schedule, ScheduleStatus,
    Workspace,
};
use uuid::Uuid;

use crate::error::AppError;

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationFilter {
    pub reserved_by: Option<Uuid>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.reserved_by.map_or(true, |id| reservation.reserved_by == id)
            && self.status.map_or(true, |s| reservation.status == s)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromotionFilter {
    pub created_by: Option<Uuid>,
    pub status: Option<PromotionStatus>,
}

impl PromotionFilter {
    pub fn matches(&self, promotion: &Promotion) -> bool {
        self.created_by.map_or(true, |id| promotion.created_by == id)
            && self.status.map_or(true, |s| promotion.status == s)
    }
}

/// Listing methods return records in creation order. Promotion selection
/// depends on that order being stable. `update_*` methods fail with
/// `AppError::NotFound` when no row has the given id.
#[async_trait]
pub trait Store: Send + Sync {
    // People
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert_person(&self, person: &Person) -> StoreResult<()>;
    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>>;
    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>>;
    async fn update_person(&self, person: &Person) -> StoreResult<()>;
    async fn list_persons(&self) -> StoreResult<Vec<Person>>;
    /// Fails with `AppError::Conflict` while reservations, workspaces or
    /// promotions still reference the person.
    async fn delete_person(&self, id: Uuid) -> StoreResult<bool>;

    // Workspaces
    async fn insert_workspace(&self, workspace: &Workspace) -> StoreResult<()>;
    async fn find_workspace(&self, id: Uuid) -> StoreResult<Option<Workspace>>;
    async fn list_workspaces(&self) -> StoreResult<Vec<Workspace>>;
    async fn update_workspace(&self, workspace: &Workspace) -> StoreResult<()>;
    async fn delete_workspace(&self, id: Uuid) -> StoreResult<bool>;

    // Schedules
    async fn insert_schedule(&self, schedule: &Schedule) -> StoreResult<()>;
    async fn list_schedules(&self, workspace_id: Uuid) -> StoreResult<Vec<Schedule>>;
    async fn set_schedule_status(
        &self,
        id: Uuid,
        status: ScheduleStatus,
    ) -> StoreResult<Option<Schedule>>;
    async fn delete_schedule(&self, id: Uuid) -> StoreResult<bool>;

    // Reservations
    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()>;
    async fn find_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>>;
    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<()>;
    async fn list_reservations(&self, filter: ReservationFilter) -> StoreResult<Vec<Reservation>>;

    // Promotions
    async fn insert_promotion(&self, promotion: &Promotion) -> StoreResult<()>;
    async fn find_promotion(&self, id: Uuid) -> StoreResult<Option<Promotion>>;
    async fn update_promotion(&self, promotion: &Promotion) -> StoreResult<()>;
    async fn delete_promotion(&self, id: Uuid) -> StoreResult<bool>;
    async fn list_promotions(&self, filter: PromotionFilter) -> StoreResult<Vec<Promotion>>;
}
