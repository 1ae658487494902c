use std::sync::Mutex;

use async_trait::async_trait;
use booking_shared::{Person, Promotion, Reservation, Schedule, ScheduleStatus, Workspace};
use uuid::Uuid;

use super::{PromotionFilter, ReservationFilter, Store, StoreResult};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    persons: Vec<Person>,
    workspaces: Vec<Workspace>,
    schedules: Vec<Schedule>,
    reservations: Vec<Reservation>,
    promotions: Vec<Promotion>,
}

/// Vec-backed store for tests. Insertion order is listing order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn replace<T: Clone>(rows: &mut [T], value: &T, same: impl Fn(&T) -> bool) -> StoreResult<()> {
    let slot = rows
        .iter_mut()
        .find(|row| same(row))
        .ok_or(AppError::NotFound)?;
    *slot = value.clone();
    Ok(())
}

fn remove<T>(rows: &mut Vec<T>, same: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !same(row));
    rows.len() != before
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_person(&self, person: &Person) -> StoreResult<()> {
        let mut tables = self.tables();
        if tables.persons.iter().any(|p| p.email == person.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        tables.persons.push(person.clone());
        Ok(())
    }

    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        Ok(self.tables().persons.iter().find(|p| p.id == id).cloned())
    }

    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        Ok(self
            .tables()
            .persons
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn update_person(&self, person: &Person) -> StoreResult<()> {
        replace(&mut self.tables().persons, person, |p| p.id == person.id)
    }

    async fn list_persons(&self) -> StoreResult<Vec<Person>> {
        Ok(self.tables().persons.clone())
    }

    async fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables();
        let in_use = tables.reservations.iter().any(|r| r.reserved_by == id)
            || tables.workspaces.iter().any(|w| w.created_by == id)
            || tables.promotions.iter().any(|p| p.created_by == id);
        if in_use {
            return Err(AppError::Conflict(
                "Person still owns reservations, workspaces or promotions".to_string(),
            ));
        }
        Ok(remove(&mut tables.persons, |p| p.id == id))
    }

    async fn insert_workspace(&self, workspace: &Workspace) -> StoreResult<()> {
        self.tables().workspaces.push(workspace.clone());
        Ok(())
    }

    async fn find_workspace(&self, id: Uuid) -> StoreResult<Option<Workspace>> {
        Ok(self.tables().workspaces.iter().find(|w| w.id == id).cloned())
    }

    async fn list_workspaces(&self) -> StoreResult<Vec<Workspace>> {
        Ok(self.tables().workspaces.clone())
    }

    async fn update_workspace(&self, workspace: &Workspace) -> StoreResult<()> {
        replace(&mut self.tables().workspaces, workspace, |w| {
            w.id == workspace.id
        })
    }

    async fn delete_workspace(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables();
        let removed = remove(&mut tables.workspaces, |w| w.id == id);
        if removed {
            tables.schedules.retain(|s| s.workspace_id != id);
            tables.reservations.retain(|r| r.workspace_id != id);
        }
        Ok(removed)
    }

    async fn insert_schedule(&self, schedule: &Schedule) -> StoreResult<()> {
        self.tables().schedules.push(schedule.clone());
        Ok(())
    }

    async fn list_schedules(&self, workspace_id: Uuid) -> StoreResult<Vec<Schedule>> {
        Ok(self
            .tables()
            .schedules
            .iter()
            .filter(|s| s.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn set_schedule_status(
        &self,
        id: Uuid,
        status: ScheduleStatus,
    ) -> StoreResult<Option<Schedule>> {
        let mut tables = self.tables();
        let updated = tables.schedules.iter_mut().find(|s| s.id == id).map(|s| {
            s.status = status;
            s.clone()
        });
        Ok(updated)
    }

    async fn delete_schedule(&self, id: Uuid) -> StoreResult<bool> {
        Ok(remove(&mut self.tables().schedules, |s| s.id == id))
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        self.tables().reservations.push(reservation.clone());
        Ok(())
    }

    async fn find_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        replace(&mut self.tables().reservations, reservation, |r| {
            r.id == reservation.id
        })
    }

    async fn list_reservations(&self, filter: ReservationFilter) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn insert_promotion(&self, promotion: &Promotion) -> StoreResult<()> {
        self.tables().promotions.push(promotion.clone());
        Ok(())
    }

    async fn find_promotion(&self, id: Uuid) -> StoreResult<Option<Promotion>> {
        Ok(self.tables().promotions.iter().find(|p| p.id == id).cloned())
    }

    async fn update_promotion(&self, promotion: &Promotion) -> StoreResult<()> {
        replace(&mut self.tables().promotions, promotion, |p| {
            p.id == promotion.id
        })
    }

    async fn delete_promotion(&self, id: Uuid) -> StoreResult<bool> {
        Ok(remove(&mut self.tables().promotions, |p| p.id == id))
    }

    async fn list_promotions(&self, filter: PromotionFilter) -> StoreResult<Vec<Promotion>> {
        Ok(self
            .tables()
            .promotions
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_shared::Role;
    use chrono::Utc;

    fn person() -> Person {
        Person {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let ghost = person();

        assert!(matches!(
            store.update_person(&ghost).await.unwrap_err(),
            AppError::NotFound
        ));

        store.insert_person(&ghost).await.unwrap();
        let mut renamed = ghost.clone();
        renamed.name = "Ana Maria".to_string();
        store.update_person(&renamed).await.unwrap();
        assert_eq!(store.find_person(ghost.id).await.unwrap().unwrap().name, "Ana Maria");
    }
}
