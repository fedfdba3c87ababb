#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use muster_domain::geo::Coordinate;
use muster_domain::id::TraineeId;

use crate::domain::types::{
    AttendanceEvent, AttendanceRecord, ConsumedCode, DayWindow, IssueOutcome, OneTimeCode,
    SiteAssignment,
};
use crate::error::AttendanceServiceError;

/// Trainee existence lookups.
pub trait TraineeRepository: Send + Sync {
    async fn exists(&self, id: TraineeId) -> Result<bool, AttendanceServiceError>;
}

/// Repository for one-time codes.
pub trait OtpRepository: Send + Sync {
    /// Delete every code whose expiry is at or before `now`, used or not,
    /// across all trainees. Returns the number of rows removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError>;

    /// Under a lock on the trainee row: return the trainee's active code if one
    /// exists, otherwise mark their unused codes used and persist `candidate`.
    async fn issue(
        &self,
        candidate: &OneTimeCode,
        now: DateTime<Utc>,
    ) -> Result<IssueOutcome, AttendanceServiceError>;

    /// Find the best row matching `code` and mark it used in the same
    /// transaction. `None` when no row carries the value.
    async fn consume(&self, code: &str) -> Result<Option<ConsumedCode>, AttendanceServiceError>;
}

/// Per-day attendance rows. Both operations lock the trainee row first and
/// return `None` when the trainee does not exist.
pub trait AttendanceRepository: Send + Sync {
    /// Delete the trainee's rows for `day` and insert a fresh check-in.
    async fn check_in(
        &self,
        trainee_id: TraineeId,
        event: AttendanceEvent,
        day: DayWindow,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;

    /// Set the check-out on the latest row for `day`, or insert a row with a
    /// sentinel check-in when there is none.
    async fn check_out(
        &self,
        trainee_id: TraineeId,
        event: AttendanceEvent,
        day: DayWindow,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;
}

/// Paired-device secrets.
pub trait DeviceRepository: Send + Sync {
    async fn secrets_for(
        &self,
        trainee_id: TraineeId,
    ) -> Result<Vec<String>, AttendanceServiceError>;
}

/// Home and site coordinates for the geofence.
pub trait AssignmentRepository: Send + Sync {
    /// `None` when the trainee is unknown or has no site.
    async fn find_assignment(
        &self,
        trainee_id: TraineeId,
    ) -> Result<Option<SiteAssignment>, AttendanceServiceError>;
}

/// Port for the external routed-distance provider.
pub trait RoutingPort: Send + Sync {
    /// Driving distance in meters. Every failure is `Upstream`.
    async fn routed_meters(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, AttendanceServiceError>;
}
