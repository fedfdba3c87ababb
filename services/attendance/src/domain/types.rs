use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use muster_domain::geo::Coordinate;
use muster_domain::id::TraineeId;

/// One-time code time-to-live in minutes.
pub const OTP_TTL_MINUTES: i64 = 30;

/// Number of decimal digits in a one-time code.
pub const OTP_DIGITS: u32 = 4;

/// Maximum routed distance (meters) between home and site to count as in range.
pub const GEOFENCE_MAX_METERS: f64 = 500.0;

/// Check-in time stored for a check-out that had no check-in that day.
pub const SENTINEL_CHECK_IN: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// One-time code bound to a trainee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub trainee_id: TraineeId,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
}

impl OneTimeCode {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && self.expires_at > now
    }
}

/// Snapshot of a code row taken under lock, just before it was marked used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedCode {
    pub trainee_id: TraineeId,
    pub expires_at: DateTime<Utc>,
    /// The row was already used before this attempt (or lost a race to one).
    pub was_used: bool,
}

/// Result of issuing a code inside the per-trainee critical section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// An active code already existed and is returned unchanged.
    Existing(OneTimeCode),
    /// The candidate code was persisted.
    Created(OneTimeCode),
    /// The trainee row disappeared between the existence check and the lock.
    TraineeMissing,
}

/// A check-in or check-out as submitted by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceEvent {
    pub position: Coordinate,
    pub at: DateTime<Utc>,
}

/// Persisted per-day attendance row.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: i32,
    pub trainee_id: TraineeId,
    pub check_in: AttendanceEvent,
    pub check_out: Option<AttendanceEvent>,
}

impl AttendanceRecord {
    /// True when the row was created by a check-out with no same-day check-in.
    pub fn has_sentinel_check_in(&self) -> bool {
        self.check_in.position == Coordinate::ORIGIN && self.check_in.at == SENTINEL_CHECK_IN
    }
}

/// Half-open UTC day `[start, end)` used to group attendance rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The UTC calendar day containing `instant`. Overnight shifts straddling
    /// midnight fall into two windows.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let start = Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN));
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether `record` belongs to this day: by check-in time, or for a
    /// sentinel row by check-out time.
    pub fn includes(&self, record: &AttendanceRecord) -> bool {
        if record.has_sentinel_check_in() {
            return record.check_out.is_some_and(|out| self.contains(out.at));
        }
        self.contains(record.check_in.at)
    }
}

/// Home and assigned-site positions of a trainee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteAssignment {
    pub trainee_id: TraineeId,
    pub home: Coordinate,
    pub site: Coordinate,
}

/// Geofence verdict with both raw distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationVerdict {
    pub assignment: SiteAssignment,
    /// Great-circle distance; diagnostic only.
    pub straight_line_meters: f64,
    pub routed_meters: f64,
    pub in_range: bool,
}
