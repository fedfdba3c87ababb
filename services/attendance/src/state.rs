use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAssignmentRepository, DbAttendanceRepository, DbDeviceRepository, DbOtpRepository,
    DbTraineeRepository,
};
use crate::infra::routing::DistanceMatrixClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub routing: DistanceMatrixClient,
}

impl AppState {
    pub fn trainee_repo(&self) -> DbTraineeRepository {
        DbTraineeRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_repo(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }

    pub fn device_repo(&self) -> DbDeviceRepository {
        DbDeviceRepository {
            db: self.db.clone(),
        }
    }

    pub fn assignment_repo(&self) -> DbAssignmentRepository {
        DbAssignmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn routing_client(&self) -> DistanceMatrixClient {
        self.routing.clone()
    }
}
