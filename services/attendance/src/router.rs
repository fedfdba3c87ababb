use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use muster_core::error::not_found;
use muster_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    attendance::record_attendance,
    device::verify_device,
    health::{healthz, readyz},
    location::validate_location,
    otp::{generate_otp, validate_otp},
    punctuality::validate_attendance,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // One-time codes
        .route("/generate-otp", post(generate_otp))
        .route("/validate-otp", post(validate_otp))
        // Device pairing
        .route("/verify-device-auth", post(verify_device))
        // Attendance
        .route("/attendance", post(record_attendance))
        .route("/validate-attendance", post(validate_attendance))
        // Geofence
        .route("/validate-location", get(validate_location))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
