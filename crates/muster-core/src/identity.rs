//! Trainee identity header extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use muster_domain::id::TraineeId;

use crate::error::AppError;

/// Header carrying the trainee id on every trainee-scoped request.
pub const STUDENT_ID_HEADER: &str = "student-id";

/// Trainee id taken from the `student-id` request header.
///
/// Rejects with 400 when the header is absent, empty, or not an integer.
#[derive(Debug, Clone, Copy)]
pub struct TraineeHeader(pub TraineeId);

impl<S> FromRequestParts<S> for TraineeHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Values are read synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let raw = parts
            .headers
            .get(STUDENT_ID_HEADER)
            .map(|v| v.to_str().map(str::to_owned));

        async move {
            let raw = match raw {
                None => return Err(AppError::BadRequest("missing student-id header")),
                Some(Err(_)) => return Err(AppError::BadRequest("invalid student-id header")),
                Some(Ok(s)) if s.trim().is_empty() => {
                    return Err(AppError::BadRequest("missing student-id header"));
                }
                Some(Ok(s)) => s,
            };
            raw.parse::<TraineeId>()
                .map(Self)
                .map_err(|_| AppError::BadRequest("invalid student-id header"))
        }
    }
}
