use chrono::{Duration, Utc};
use rand::RngExt;

use muster_domain::id::TraineeId;

use crate::domain::repository::{OtpRepository, TraineeRepository};
use crate::domain::types::{IssueOutcome, OTP_DIGITS, OTP_TTL_MINUTES, OneTimeCode};
use crate::error::AttendanceServiceError;

/// Zero-padded decimal code drawn from the thread-local CSPRNG.
fn generate_code() -> String {
    let mut rng = rand::rng();
    let value = rng.random_range(0..10u32.pow(OTP_DIGITS));
    format!("{value:0width$}", width = OTP_DIGITS as usize)
}

// ── Generate ─────────────────────────────────────────────────────────────────

pub struct GenerateOtpInput {
    pub trainee_id: TraineeId,
}

pub struct GenerateOtpUseCase<T, O>
where
    T: TraineeRepository,
    O: OtpRepository,
{
    pub trainees: T,
    pub otps: O,
}

impl<T, O> GenerateOtpUseCase<T, O>
where
    T: TraineeRepository,
    O: OtpRepository,
{
    /// Returns the trainee's active code, or a fresh one if none is active.
    pub async fn execute(
        &self,
        input: GenerateOtpInput,
    ) -> Result<OneTimeCode, AttendanceServiceError> {
        let trainee_id = input.trainee_id;
        if !self.trainees.exists(trainee_id).await? {
            return Err(AttendanceServiceError::TraineeNotFound);
        }

        let now = Utc::now();
        let swept = self.otps.sweep_expired(now).await?;
        if swept > 0 {
            tracing::debug!(swept, "swept expired otps");
        }

        let candidate = OneTimeCode {
            trainee_id,
            code: generate_code(),
            created_at: now,
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
            is_used: false,
        };
        match self.otps.issue(&candidate, now).await? {
            IssueOutcome::Existing(code) => {
                tracing::debug!(trainee_id = %trainee_id, "returning active otp");
                Ok(code)
            }
            IssueOutcome::Created(code) => {
                tracing::info!(
                    trainee_id = %trainee_id,
                    expires_at = %code.expires_at,
                    "otp issued"
                );
                Ok(code)
            }
            IssueOutcome::TraineeMissing => Err(AttendanceServiceError::TraineeNotFound),
        }
    }
}

// ── Validate ─────────────────────────────────────────────────────────────────

pub struct ValidateOtpInput {
    pub code: String,
}

pub struct ValidateOtpUseCase<O>
where
    O: OtpRepository,
{
    pub otps: O,
}

impl<O> ValidateOtpUseCase<O>
where
    O: OtpRepository,
{
    /// Consumes the code and returns the trainee it was bound to.
    ///
    /// Every lookup that finds a row burns it, including the one that
    /// reports `OtpExpired`.
    pub async fn execute(
        &self,
        input: ValidateOtpInput,
    ) -> Result<TraineeId, AttendanceServiceError> {
        let code = input.code.trim();
        if code.is_empty() {
            return Err(AttendanceServiceError::InvalidOtp);
        }

        let consumed = self
            .otps
            .consume(code)
            .await?
            .ok_or(AttendanceServiceError::InvalidOtp)?;

        if consumed.was_used {
            return Err(AttendanceServiceError::OtpAlreadyUsed);
        }
        if consumed.expires_at <= Utc::now() {
            tracing::info!(trainee_id = %consumed.trainee_id, "expired otp presented");
            return Err(AttendanceServiceError::OtpExpired);
        }

        tracing::info!(trainee_id = %consumed.trainee_id, "otp validated");
        Ok(consumed.trainee_id)
    }
}
