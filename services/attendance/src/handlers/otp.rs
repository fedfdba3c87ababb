use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use muster_core::identity::TraineeHeader;
use muster_core::serde::to_rfc3339_ms;
use muster_domain::id::TraineeId;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::otp::{
    GenerateOtpInput, GenerateOtpUseCase, ValidateOtpInput, ValidateOtpUseCase,
};

pub const OTP_CODE_HEADER: &str = "otp-code";

const AUTHENTICATION_SUCCESSFUL: &str = "Authentication successful";

// ── POST /generate-otp ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GenerateOtpResponse {
    pub student_id: TraineeId,
    pub otp_code: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn generate_otp(
    State(state): State<AppState>,
    TraineeHeader(trainee_id): TraineeHeader,
) -> Result<(StatusCode, Json<GenerateOtpResponse>), AttendanceServiceError> {
    let usecase = GenerateOtpUseCase {
        trainees: state.trainee_repo(),
        otps: state.otp_repo(),
    };
    let code = usecase.execute(GenerateOtpInput { trainee_id }).await?;
    Ok((
        StatusCode::CREATED,
        Json(GenerateOtpResponse {
            student_id: code.trainee_id,
            otp_code: code.code,
            expires_at: code.expires_at,
        }),
    ))
}

// ── POST /validate-otp ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidateOtpResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<TraineeId>,
    pub message: String,
}

impl ValidateOtpResponse {
    /// Map a validation outcome onto the wire body. Rejections become
    /// `success: false`; anything else stays an error.
    pub fn from_outcome(
        outcome: Result<TraineeId, AttendanceServiceError>,
    ) -> Result<Self, AttendanceServiceError> {
        match outcome {
            Ok(trainee_id) => Ok(Self {
                success: true,
                student_id: Some(trainee_id),
                message: AUTHENTICATION_SUCCESSFUL.to_owned(),
            }),
            Err(e) if e.is_otp_rejection() => Ok(Self {
                success: false,
                student_id: None,
                message: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

pub async fn validate_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidateOtpResponse>, AttendanceServiceError> {
    let code = headers
        .get(OTP_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AttendanceServiceError::InvalidInput("missing otp-code header".to_owned())
        })?;

    let usecase = ValidateOtpUseCase {
        otps: state.otp_repo(),
    };
    let outcome = usecase
        .execute(ValidateOtpInput {
            code: code.to_owned(),
        })
        .await;
    Ok(Json(ValidateOtpResponse::from_outcome(outcome)?))
}
