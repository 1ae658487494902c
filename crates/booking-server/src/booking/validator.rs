use booking_shared::{
    api::CreateReservationRequest, Person, ReservationStatus, Schedule, Workspace,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Only users can reserve workspaces")]
    InvalidUser,

    #[error("Workspace does not exist")]
    InvalidWorkspace,

    #[error("Start time must be before end time")]
    InvalidTimeRange,

    #[error("Reservation status must be active")]
    InvalidStatus,

    #[error("Reservation price must not be negative")]
    InvalidPrice,

    #[error("Reservation is outside the workspace's available schedules")]
    OutsideSchedule,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUser => "invalid_user",
            Self::InvalidWorkspace => "invalid_workspace",
            Self::InvalidTimeRange => "invalid_time_range",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidPrice => "invalid_price",
            Self::OutsideSchedule => "outside_schedule",
        }
    }
}

/// Reservation fields as submitted, before any checks.
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub reserved_by: Uuid,
    pub workspace_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub price: Decimal,
}

impl From<&CreateReservationRequest> for ReservationDraft {
    fn from(req: &CreateReservationRequest) -> Self {
        Self {
            reserved_by: req.reserved_by,
            workspace_id: req.workspace_id,
            start_time: req.start_time,
            end_time: req.end_time,
            status: req.status,
            price: req.price,
        }
    }
}

/// The time window and price a promotion is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct BookingWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
}

/// A draft that passed every check. Only `validate` builds one.
#[derive(Debug, Clone)]
pub struct ValidatedReservation {
    reserved_by: Uuid,
    workspace_id: Uuid,
    window: BookingWindow,
}

impl ValidatedReservation {
    pub fn reserved_by(&self) -> Uuid {
        self.reserved_by
    }

    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    pub fn window(&self) -> BookingWindow {
        self.window
    }
}

/// Checks run in a fixed order and stop at the first failure.
pub fn validate(
    draft: &ReservationDraft,
    user: Option<&Person>,
    workspace: Option<&Workspace>,
) -> Result<ValidatedReservation, ValidationError> {
    let user = user.ok_or(ValidationError::InvalidUser)?;
    if !user.role.is_user() {
        return Err(ValidationError::InvalidUser);
    }

    let workspace = workspace.ok_or(ValidationError::InvalidWorkspace)?;

    check_time_range(draft.start_time, draft.end_time)?;

    if draft.status != ReservationStatus::Active {
        return Err(ValidationError::InvalidStatus);
    }

    check_price(draft.price)?;

    Ok(ValidatedReservation {
        reserved_by: user.id,
        workspace_id: workspace.id,
        window: BookingWindow {
            start_time: draft.start_time,
            end_time: draft.end_time,
            price: draft.price,
        },
    })
}

pub fn check_time_range(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if start_time < end_time {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeRange)
    }
}

pub fn check_price(price: Decimal) -> Result<(), ValidationError> {
    if price < Decimal::ZERO {
        Err(ValidationError::InvalidPrice)
    } else {
        Ok(())
    }
}

pub fn ensure_within_schedule(
    reservation: &ValidatedReservation,
    schedules: &[Schedule],
) -> Result<(), ValidationError> {
    let window = reservation.window();
    if schedules
        .iter()
        .any(|s| s.workspace_id == reservation.workspace_id && s.covers(window.start_time, window.end_time))
    {
        Ok(())
    } else {
        Err(ValidationError::OutsideSchedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_shared::{Role, ScheduleStatus, WorkspaceKind};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap()
    }

    fn person(role: Role) -> Person {
        Person {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: at(0),
        }
    }

    fn workspace() -> Workspace {
        Workspace {
            id: Uuid::new_v4(),
            kind: WorkspaceKind::MeetingRoom,
            capacity: 2,
            hourly_rate: Decimal::new(10, 0),
            created_by: Uuid::new_v4(),
            created_at: at(0),
        }
    }

    fn draft(user: &Person, ws: &Workspace) -> ReservationDraft {
        ReservationDraft {
            reserved_by: user.id,
            workspace_id: ws.id,
            start_time: at(9),
            end_time: at(11),
            status: ReservationStatus::Active,
            price: Decimal::new(20, 0),
        }
    }

    #[test]
    fn test_validate_accepts_user_reservation() {
        let user = person(Role::User);
        let ws = workspace();
        let validated = validate(&draft(&user, &ws), Some(&user), Some(&ws)).unwrap();

        assert_eq!(validated.reserved_by(), user.id);
        assert_eq!(validated.workspace_id(), ws.id);
        assert_eq!(validated.window().price, Decimal::new(20, 0));
    }

    #[test]
    fn test_validate_rejects_admin() {
        let admin = person(Role::Admin);
        let ws = workspace();
        let err = validate(&draft(&admin, &ws), Some(&admin), Some(&ws)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidUser);
    }

    #[test]
    fn test_validate_rejects_missing_user() {
        let user = person(Role::User);
        let ws = workspace();
        let err = validate(&draft(&user, &ws), None, Some(&ws)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidUser);
    }

    #[test]
    fn test_validate_rejects_missing_workspace() {
        let user = person(Role::User);
        let ws = workspace();
        let err = validate(&draft(&user, &ws), Some(&user), None).unwrap_err();
        assert_eq!(err, ValidationError::InvalidWorkspace);
    }

    #[test]
    fn test_validate_rejects_empty_or_inverted_window() {
        let user = person(Role::User);
        let ws = workspace();

        let mut empty = draft(&user, &ws);
        empty.end_time = empty.start_time;
        assert_eq!(
            validate(&empty, Some(&user), Some(&ws)).unwrap_err(),
            ValidationError::InvalidTimeRange
        );

        let mut inverted = draft(&user, &ws);
        inverted.start_time = at(12);
        assert_eq!(
            validate(&inverted, Some(&user), Some(&ws)).unwrap_err(),
            ValidationError::InvalidTimeRange
        );
    }

    #[test]
    fn test_validate_rejects_cancelled_status() {
        let user = person(Role::User);
        let ws = workspace();
        let mut d = draft(&user, &ws);
        d.status = ReservationStatus::Cancelled;
        assert_eq!(
            validate(&d, Some(&user), Some(&ws)).unwrap_err(),
            ValidationError::InvalidStatus
        );
    }

    #[test]
    fn test_validate_price_bounds() {
        let user = person(Role::User);
        let ws = workspace();

        let mut negative = draft(&user, &ws);
        negative.price = Decimal::new(-1, 2);
        assert_eq!(
            validate(&negative, Some(&user), Some(&ws)).unwrap_err(),
            ValidationError::InvalidPrice
        );

        let mut free = draft(&user, &ws);
        free.price = Decimal::ZERO;
        assert!(validate(&free, Some(&user), Some(&ws)).is_ok());
    }

    #[test]
    fn test_validate_stops_at_first_failure() {
        let admin = person(Role::Admin);
        let ws = workspace();
        let mut d = draft(&admin, &ws);
        d.end_time = d.start_time;
        d.price = Decimal::NEGATIVE_ONE;
        assert_eq!(
            validate(&d, Some(&admin), None).unwrap_err(),
            ValidationError::InvalidUser
        );
    }

    #[test]
    fn test_ensure_within_schedule() {
        let user = person(Role::User);
        let ws = workspace();
        let validated = validate(&draft(&user, &ws), Some(&user), Some(&ws)).unwrap();

        let open = Schedule {
            id: Uuid::new_v4(),
            workspace_id: ws.id,
            opening_time: at(8),
            closing_time: at(18),
            status: ScheduleStatus::Available,
        };
        assert!(ensure_within_schedule(&validated, &[open.clone()]).is_ok());

        let closed = Schedule {
            status: ScheduleStatus::Unavailable,
            ..open.clone()
        };
        assert_eq!(
            ensure_within_schedule(&validated, &[closed]).unwrap_err(),
            ValidationError::OutsideSchedule
        );

        let too_short = Schedule {
            closing_time: at(10),
            ..open
        };
        assert_eq!(
            ensure_within_schedule(&validated, &[too_short]).unwrap_err(),
            ValidationError::OutsideSchedule
        );
        assert_eq!(
            ensure_within_schedule(&validated, &[]).unwrap_err(),
            ValidationError::OutsideSchedule
        );
    }
}
