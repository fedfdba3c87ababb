use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use muster_domain::id::TraineeId;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::device::{VerifyDeviceInput, VerifyDeviceUseCase};

#[derive(Deserialize)]
pub struct VerifyDeviceRequest {
    pub student_id: TraineeId,
    pub secret_code: String,
}

#[derive(Serialize)]
pub struct VerifyDeviceResponse {
    pub authorized: bool,
}

pub async fn verify_device(
    State(state): State<AppState>,
    Json(body): Json<VerifyDeviceRequest>,
) -> Result<Json<VerifyDeviceResponse>, AttendanceServiceError> {
    let usecase = VerifyDeviceUseCase {
        devices: state.device_repo(),
    };
    let authorized = usecase
        .execute(VerifyDeviceInput {
            trainee_id: body.student_id,
            secret: body.secret_code,
        })
        .await?;
    Ok(Json(VerifyDeviceResponse { authorized }))
}
