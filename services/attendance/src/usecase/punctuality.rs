use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::AttendanceServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    CheckIn,
    CheckOut,
}

impl FromStr for CheckKind {
    type Err = AttendanceServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "checkin" => Ok(Self::CheckIn),
            "checkout" => Ok(Self::CheckOut),
            other => Err(AttendanceServiceError::InvalidInput(format!(
                "check_type must be \"checkin\" or \"checkout\", got {other:?}"
            ))),
        }
    }
}

/// `actual - scheduled` in whole minutes, rounded half away from zero.
/// Negative means early.
pub fn minutes_off_schedule(scheduled: DateTime<Utc>, actual: DateTime<Utc>) -> i64 {
    let seconds = (actual - scheduled).num_milliseconds() as f64 / 1000.0;
    (seconds / 60.0).round() as i64
}

pub struct CheckPunctualityInput {
    pub kind: CheckKind,
    pub scheduled_check_in: Option<DateTime<Utc>>,
    pub scheduled_check_out: Option<DateTime<Utc>>,
    pub actual_check_in: Option<DateTime<Utc>>,
    pub actual_check_out: Option<DateTime<Utc>>,
}

pub struct CheckPunctualityUseCase;

impl CheckPunctualityUseCase {
    pub fn execute(&self, input: CheckPunctualityInput) -> Result<i64, AttendanceServiceError> {
        let (scheduled, actual) = match input.kind {
            CheckKind::CheckIn => (input.scheduled_check_in, input.actual_check_in),
            CheckKind::CheckOut => (input.scheduled_check_out, input.actual_check_out),
        };
        match (scheduled, actual) {
            (Some(scheduled), Some(actual)) => Ok(minutes_off_schedule(scheduled, actual)),
            _ => Err(AttendanceServiceError::InvalidInput(
                "scheduled and actual times are required for the selected check_type".to_owned(),
            )),
        }
    }
}
