use chrono::{DateTime, Utc};

use muster_domain::geo::Coordinate;
use muster_domain::id::TraineeId;

use crate::domain::repository::AttendanceRepository;
use crate::domain::types::{AttendanceEvent, AttendanceRecord, DayWindow};
use crate::error::AttendanceServiceError;

pub struct RecordAttendanceInput {
    pub trainee_id: TraineeId,
    pub is_check_in: bool,
    pub lat: f64,
    pub long: f64,
    /// RFC 3339 with offset, as sent by the device.
    pub timestamp: String,
}

pub struct RecordAttendanceUseCase<A>
where
    A: AttendanceRepository,
{
    pub attendance: A,
}

impl<A> RecordAttendanceUseCase<A>
where
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        input: RecordAttendanceInput,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        // Validate everything before touching the store.
        let at = DateTime::parse_from_rfc3339(input.timestamp.trim())
            .map_err(|e| {
                AttendanceServiceError::InvalidInput(format!(
                    "timestamp must be RFC 3339 with offset: {e}"
                ))
            })?
            .with_timezone(&Utc);
        let position = Coordinate::checked(input.lat, input.long)
            .map_err(|e| AttendanceServiceError::InvalidInput(e.to_string()))?;

        let event = AttendanceEvent { position, at };
        // The day is the server's UTC day, never the event's.
        let day = DayWindow::containing(Utc::now());

        let record = if input.is_check_in {
            self.attendance
                .check_in(input.trainee_id, event, day)
                .await?
        } else {
            self.attendance
                .check_out(input.trainee_id, event, day)
                .await?
        }
        .ok_or(AttendanceServiceError::TraineeNotFound)?;

        tracing::info!(
            trainee_id = %input.trainee_id,
            record_id = record.id,
            check_in = input.is_check_in,
            "attendance recorded"
        );
        Ok(record)
    }
}
