use muster_domain::geo::haversine_meters;
use muster_domain::id::TraineeId;

use crate::domain::repository::{AssignmentRepository, RoutingPort};
use crate::domain::types::{GEOFENCE_MAX_METERS, LocationVerdict};
use crate::error::AttendanceServiceError;

pub struct ValidateLocationInput {
    pub trainee_id: TraineeId,
}

pub struct ValidateLocationUseCase<A, R>
where
    A: AssignmentRepository,
    R: RoutingPort,
{
    pub assignments: A,
    pub routing: R,
}

impl<A, R> ValidateLocationUseCase<A, R>
where
    A: AssignmentRepository,
    R: RoutingPort,
{
    /// The verdict uses the routed distance only; a routing failure fails the call.
    pub async fn execute(
        &self,
        input: ValidateLocationInput,
    ) -> Result<LocationVerdict, AttendanceServiceError> {
        let assignment = self
            .assignments
            .find_assignment(input.trainee_id)
            .await?
            .ok_or(AttendanceServiceError::AssignmentNotFound)?;

        let straight_line_meters = haversine_meters(assignment.home, assignment.site);
        let routed_meters = self
            .routing
            .routed_meters(assignment.home, assignment.site)
            .await?;
        let in_range = routed_meters <= GEOFENCE_MAX_METERS;

        tracing::info!(
            trainee_id = %input.trainee_id,
            straight_line_meters,
            routed_meters,
            in_range,
            "location validated"
        );
        Ok(LocationVerdict {
            assignment,
            straight_line_meters,
            routed_meters,
            in_range,
        })
    }
}
