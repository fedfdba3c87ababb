use axum::{Json, extract::State};
use serde::Serialize;

use muster_core::identity::TraineeHeader;

use crate::domain::types::LocationVerdict;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::geofence::{ValidateLocationInput, ValidateLocationUseCase};

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub employer_lat: f64,
    pub employer_long: f64,
    pub student_lat: f64,
    pub student_long: f64,
    pub displacement_meters: f64,
    pub driving_distance_meters: f64,
    pub in_range: bool,
}

impl From<LocationVerdict> for LocationResponse {
    fn from(v: LocationVerdict) -> Self {
        Self {
            employer_lat: v.assignment.site.lat,
            employer_long: v.assignment.site.long,
            student_lat: v.assignment.home.lat,
            student_long: v.assignment.home.long,
            displacement_meters: v.straight_line_meters,
            driving_distance_meters: v.routed_meters,
            in_range: v.in_range,
        }
    }
}

pub async fn validate_location(
    State(state): State<AppState>,
    TraineeHeader(trainee_id): TraineeHeader,
) -> Result<Json<LocationResponse>, AttendanceServiceError> {
    let usecase = ValidateLocationUseCase {
        assignments: state.assignment_repo(),
        routing: state.routing_client(),
    };
    let verdict = usecase
        .execute(ValidateLocationInput { trainee_id })
        .await?;
    Ok(Json(verdict.into()))
}
