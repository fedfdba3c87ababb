use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use muster_core::identity::TraineeHeader;

use crate::error::AttendanceServiceError;
use crate::usecase::punctuality::{CheckKind, CheckPunctualityInput, CheckPunctualityUseCase};

#[derive(Deserialize)]
pub struct ValidateAttendanceRequest {
    pub check_type: String,
    pub scheduled_check_in: Option<DateTime<Utc>>,
    pub scheduled_check_out: Option<DateTime<Utc>>,
    pub actual_check_in: Option<DateTime<Utc>>,
    pub actual_check_out: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ValidateAttendanceResponse {
    pub minutes_difference: i64,
}

pub async fn validate_attendance(
    TraineeHeader(trainee_id): TraineeHeader,
    Json(body): Json<ValidateAttendanceRequest>,
) -> Result<Json<ValidateAttendanceResponse>, AttendanceServiceError> {
    let kind: CheckKind = body.check_type.parse()?;
    let minutes_difference = CheckPunctualityUseCase.execute(CheckPunctualityInput {
        kind,
        scheduled_check_in: body.scheduled_check_in,
        scheduled_check_out: body.scheduled_check_out,
        actual_check_in: body.actual_check_in,
        actual_check_out: body.actual_check_out,
    })?;
    tracing::debug!(trainee_id = %trainee_id, ?kind, minutes_difference, "punctuality checked");
    Ok(Json(ValidateAttendanceResponse { minutes_difference }))
}
