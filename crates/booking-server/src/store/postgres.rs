use async_trait::async_trait;
use booking_shared::{
    DiscountType, Person, Promotion, PromotionStatus, Reservation, ReservationStatus, Role,
    Schedule, ScheduleStatus, Workspace, WorkspaceKind,
};
use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use super::{PromotionFilter, ReservationFilter, Store, StoreResult};
use crate::db::DbPool;
use crate::error::AppError;

#[derive(Clone)]
pub struct PgStore {
    db: DbPool,
}

impl PgStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

type PersonRow = (Uuid, String, String, String, Role, DateTime<Utc>);

fn row_to_person(row: PersonRow) -> Person {
    Person {
        id: row.0,
        name: row.1,
        email: row.2,
        password_hash: row.3,
        role: row.4,
        created_at: row.5,
    }
}

type WorkspaceRow = (Uuid, WorkspaceKind, i32, Decimal, Uuid, DateTime<Utc>);

fn row_to_workspace(row: WorkspaceRow) -> Workspace {
    Workspace {
        id: row.0,
        kind: row.1,
        capacity: row.2,
        hourly_rate: row.3,
        created_by: row.4,
        created_at: row.5,
    }
}

type ScheduleRow = (Uuid, Uuid, DateTime<Utc>, DateTime<Utc>, ScheduleStatus);

fn row_to_schedule(row: ScheduleRow) -> Schedule {
    Schedule {
        id: row.0,
        workspace_id: row.1,
        opening_time: row.2,
        closing_time: row.3,
        status: row.4,
    }
}

type ReservationRow = (
    Uuid,                          // id
    Uuid,                          // reserved_by
    Uuid,                          // workspace_id
    DateTime<Utc>,                 // start_time
    DateTime<Utc>,                 // end_time
    ReservationStatus,             // status
    Decimal,                       // price
    Option<DateTime<Utc>>,         // cancelled_at
    DateTime<Utc>,                 // created_at
);

fn row_to_reservation(row: ReservationRow) -> Reservation {
    Reservation {
        id: row.0,
        reserved_by: row.1,
        workspace_id: row.2,
        start_time: row.3,
        end_time: row.4,
        status: row.5,
        price: row.6,
        cancelled_at: row.7,
        created_at: row.8,
    }
}

type PromotionRow = (
    Uuid,            // id
    String,          // description
    Decimal,         // discount
    DiscountType,    // discount_type
    DateTime<Utc>,   // start_time
    DateTime<Utc>,   // end_time
    PromotionStatus, // status
    Uuid,            // created_by
    i64,             // min_duration_minutes
    Vec<i16>,        // applicable_days, 0 = Monday
    DateTime<Utc>,   // created_at
);

fn row_to_promotion(row: PromotionRow) -> StoreResult<Promotion> {
    let applicable_days = row
        .9
        .into_iter()
        .map(weekday_from_index)
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(Promotion {
        id: row.0,
        description: row.1,
        discount: row.2,
        discount_type: row.3,
        start_time: row.4,
        end_time: row.5,
        status: row.6,
        created_by: row.7,
        min_duration_minutes: row.8,
        applicable_days,
        created_at: row.10,
    })
}

fn weekday_to_index(day: Weekday) -> i16 {
    day.num_days_from_monday() as i16
}

fn weekday_from_index(index: i16) -> StoreResult<Weekday> {
    let day = match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        other => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Stored weekday index out of range: {}",
                other
            )))
        }
    };
    Ok(day)
}

/// Updates address a single row by id; zero rows means it is gone.
fn updated_one(result: PgQueryResult) -> StoreResult<()> {
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn conflict_on_foreign_key(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

const PERSON_IN_USE: &str = "Person still owns reservations, workspaces or promotions";

const PERSON_COLUMNS: &str = "id, name, email, password_hash, role, created_at";
const WORKSPACE_COLUMNS: &str = "id, kind, capacity, hourly_rate, created_by, created_at";
const SCHEDULE_COLUMNS: &str = "id, workspace_id, opening_time, closing_time, status";
const RESERVATION_COLUMNS: &str =
    "id, reserved_by, workspace_id, start_time, end_time, status, price, cancelled_at, created_at";
const PROMOTION_COLUMNS: &str = "id, description, discount, discount_type, start_time, end_time, status, created_by, min_duration_minutes, applicable_days, created_at";

#[async_trait]
impl Store for PgStore {
    async fn insert_person(&self, person: &Person) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO persons (id, name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.email)
        .bind(&person.password_hash)
        .bind(person.role)
        .bind(person.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already registered"))?;

        Ok(())
    }

    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        let row: Option<PersonRow> =
            sqlx::query_as(&format!("SELECT {} FROM persons WHERE id = $1", PERSON_COLUMNS))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(row.map(row_to_person))
    }

    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        let row: Option<PersonRow> = sqlx::query_as(&format!(
            "SELECT {} FROM persons WHERE email = $1",
            PERSON_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(row_to_person))
    }

    async fn update_person(&self, person: &Person) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE persons SET name = $1, password_hash = $2, role = $3 WHERE id = $4")
                .bind(&person.name)
                .bind(&person.password_hash)
                .bind(person.role)
                .bind(person.id)
                .execute(&self.db)
                .await?;

        updated_one(result)
    }

    async fn list_persons(&self) -> StoreResult<Vec<Person>> {
        let rows: Vec<PersonRow> = sqlx::query_as(&format!(
            "SELECT {} FROM persons ORDER BY created_at ASC",
            PERSON_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(row_to_person).collect())
    }

    async fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| conflict_on_foreign_key(e, PERSON_IN_USE))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_workspace(&self, workspace: &Workspace) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO workspaces (id, kind, capacity, hourly_rate, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(workspace.id)
        .bind(workspace.kind)
        .bind(workspace.capacity)
        .bind(workspace.hourly_rate)
        .bind(workspace.created_by)
        .bind(workspace.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_workspace(&self, id: Uuid) -> StoreResult<Option<Workspace>> {
        let row: Option<WorkspaceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM workspaces WHERE id = $1",
            WORKSPACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(row_to_workspace))
    }

    async fn list_workspaces(&self) -> StoreResult<Vec<Workspace>> {
        let rows: Vec<WorkspaceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM workspaces ORDER BY created_at ASC",
            WORKSPACE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(row_to_workspace).collect())
    }

    async fn update_workspace(&self, workspace: &Workspace) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE workspaces SET kind = $1, capacity = $2, hourly_rate = $3 WHERE id = $4",
        )
        .bind(workspace.kind)
        .bind(workspace.capacity)
        .bind(workspace.hourly_rate)
        .bind(workspace.id)
        .execute(&self.db)
        .await?;

        updated_one(result)
    }

    async fn delete_workspace(&self, id: Uuid) -> StoreResult<bool> {
        // Cascades to schedules and reservations
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_schedule(&self, schedule: &Schedule) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO schedules (id, workspace_id, opening_time, closing_time, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.workspace_id)
        .bind(schedule.opening_time)
        .bind(schedule.closing_time)
        .bind(schedule.status)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn list_schedules(&self, workspace_id: Uuid) -> StoreResult<Vec<Schedule>> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM schedules WHERE workspace_id = $1 ORDER BY opening_time ASC",
            SCHEDULE_COLUMNS
        ))
        .bind(workspace_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(row_to_schedule).collect())
    }

    async fn set_schedule_status(
        &self,
        id: Uuid,
        status: ScheduleStatus,
    ) -> StoreResult<Option<Schedule>> {
        let row: Option<ScheduleRow> = sqlx::query_as(&format!(
            "UPDATE schedules SET status = $1 WHERE id = $2 RETURNING {}",
            SCHEDULE_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(row_to_schedule))
    }

    async fn delete_schedule(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations
                (id, reserved_by, workspace_id, start_time, end_time, status, price, cancelled_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.reserved_by)
        .bind(reservation.workspace_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.status)
        .bind(reservation.price)
        .bind(reservation.cancelled_at)
        .bind(reservation.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_reservation(&self, id: Uuid) -> StoreResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(row_to_reservation))
    }

    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET reserved_by = $1,
                workspace_id = $2,
                start_time = $3,
                end_time = $4,
                status = $5,
                price = $6,
                cancelled_at = $7
            WHERE id = $8
            "#,
        )
        .bind(reservation.reserved_by)
        .bind(reservation.workspace_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.status)
        .bind(reservation.price)
        .bind(reservation.cancelled_at)
        .bind(reservation.id)
        .execute(&self.db)
        .await?;

        updated_one(result)
    }

    async fn list_reservations(&self, filter: ReservationFilter) -> StoreResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE ($1::uuid IS NULL OR reserved_by = $1)
              AND ($2::reservation_status IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(filter.reserved_by)
        .bind(filter.status)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(row_to_reservation).collect())
    }

    async fn insert_promotion(&self, promotion: &Promotion) -> StoreResult<()> {
        let days: Vec<i16> = promotion
            .applicable_days
            .iter()
            .copied()
            .map(weekday_to_index)
            .collect();

        sqlx::query(
            r#"
            INSERT INTO promotions
                (id, description, discount, discount_type, start_time, end_time, status,
                 created_by, min_duration_minutes, applicable_days, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(promotion.id)
        .bind(&promotion.description)
        .bind(promotion.discount)
        .bind(promotion.discount_type)
        .bind(promotion.start_time)
        .bind(promotion.end_time)
        .bind(promotion.status)
        .bind(promotion.created_by)
        .bind(promotion.min_duration_minutes)
        .bind(days)
        .bind(promotion.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_promotion(&self, id: Uuid) -> StoreResult<Option<Promotion>> {
        let row: Option<PromotionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM promotions WHERE id = $1",
            PROMOTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(row_to_promotion).transpose()
    }

    async fn update_promotion(&self, promotion: &Promotion) -> StoreResult<()> {
        let days: Vec<i16> = promotion
            .applicable_days
            .iter()
            .copied()
            .map(weekday_to_index)
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE promotions
            SET description = $1,
                discount = $2,
                discount_type = $3,
                start_time = $4,
                end_time = $5,
                status = $6,
                min_duration_minutes = $7,
                applicable_days = $8
            WHERE id = $9
            "#,
        )
        .bind(&promotion.description)
        .bind(promotion.discount)
        .bind(promotion.discount_type)
        .bind(promotion.start_time)
        .bind(promotion.end_time)
        .bind(promotion.status)
        .bind(promotion.min_duration_minutes)
        .bind(days)
        .bind(promotion.id)
        .execute(&self.db)
        .await?;

        updated_one(result)
    }

    async fn delete_promotion(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_promotions(&self, filter: PromotionFilter) -> StoreResult<Vec<Promotion>> {
        let rows: Vec<PromotionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM promotions
            WHERE ($1::uuid IS NULL OR created_by = $1)
              AND ($2::promotion_status IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#,
            PROMOTION_COLUMNS
        ))
        .bind(filter.created_by)
        .bind(filter.status)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_promotion).collect()
    }
}
