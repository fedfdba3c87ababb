use subtle::{Choice, ConstantTimeEq};

use muster_domain::id::TraineeId;

use crate::domain::repository::DeviceRepository;
use crate::error::AttendanceServiceError;

/// Compare `secret` with every candidate without short-circuiting on a match.
fn matches_any(candidates: &[String], secret: &str) -> bool {
    let mut matched = Choice::from(0);
    for candidate in candidates {
        matched |= candidate.as_bytes().ct_eq(secret.as_bytes());
    }
    matched.into()
}

pub struct VerifyDeviceInput {
    pub trainee_id: TraineeId,
    pub secret: String,
}

pub struct VerifyDeviceUseCase<D>
where
    D: DeviceRepository,
{
    pub devices: D,
}

impl<D> VerifyDeviceUseCase<D>
where
    D: DeviceRepository,
{
    /// `true` iff a pairing for the trainee carries exactly this secret.
    pub async fn execute(&self, input: VerifyDeviceInput) -> Result<bool, AttendanceServiceError> {
        let secrets = self.devices.secrets_for(input.trainee_id).await?;
        let authorized = matches_any(&secrets, &input.secret);
        tracing::info!(trainee_id = %input.trainee_id, authorized, "device verification");
        Ok(authorized)
    }
}
