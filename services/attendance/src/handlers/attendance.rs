use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use muster_core::identity::TraineeHeader;
use muster_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use muster_domain::id::TraineeId;

use crate::domain::types::AttendanceRecord;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::attendance::{RecordAttendanceInput, RecordAttendanceUseCase};

/// `check_in` selects the event kind; the position and timestamp fields are
/// named after the check-in columns for both kinds.
#[derive(Deserialize)]
pub struct RecordAttendanceRequest {
    pub check_in: bool,
    pub check_in_lat: f64,
    pub check_in_long: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: i32,
    pub student_id: TraineeId,
    pub check_in_lat: f64,
    pub check_in_long: f64,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub check_in_date_time: DateTime<Utc>,
    pub check_out_lat: Option<f64>,
    pub check_out_long: Option<f64>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub check_out_date_time: Option<DateTime<Utc>>,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.trainee_id,
            check_in_lat: record.check_in.position.lat,
            check_in_long: record.check_in.position.long,
            check_in_date_time: record.check_in.at,
            check_out_lat: record.check_out.map(|e| e.position.lat),
            check_out_long: record.check_out.map(|e| e.position.long),
            check_out_date_time: record.check_out.map(|e| e.at),
        }
    }
}

pub async fn record_attendance(
    State(state): State<AppState>,
    TraineeHeader(trainee_id): TraineeHeader,
    Json(body): Json<RecordAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, AttendanceServiceError> {
    let usecase = RecordAttendanceUseCase {
        attendance: state.attendance_repo(),
    };
    let record = usecase
        .execute(RecordAttendanceInput {
            trainee_id,
            is_check_in: body.check_in,
            lat: body.check_in_lat,
            long: body.check_in_long,
            timestamp: body.timestamp,
        })
        .await?;
    Ok(Json(record.into()))
}
