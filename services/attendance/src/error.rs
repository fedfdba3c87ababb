use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Attendance service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("trainee not found")]
    TraineeNotFound,
    #[error("no site assignment found")]
    AssignmentNotFound,
    #[error("Invalid OTP")]
    InvalidOtp,
    #[error("OTP has already been used")]
    OtpAlreadyUsed,
    #[error("OTP has expired")]
    OtpExpired,
    #[error("routing provider error")]
    Upstream(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::TraineeNotFound => "TRAINEE_NOT_FOUND",
            Self::AssignmentNotFound => "ASSIGNMENT_NOT_FOUND",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpAlreadyUsed => "OTP_ALREADY_USED",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// True for the three ways a one-time code can be rejected.
    pub fn is_otp_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidOtp | Self::OtpAlreadyUsed | Self::OtpExpired
        )
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::TraineeNotFound | Self::AssignmentNotFound => StatusCode::NOT_FOUND,
            Self::InvalidOtp | Self::OtpAlreadyUsed | Self::OtpExpired => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records method/uri/status; only 5xx carry a chain worth logging.
        match &self {
            Self::Upstream(e) => {
                tracing::error!(error = ?e, kind = "UPSTREAM", "upstream error");
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
