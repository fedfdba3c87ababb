use chrono::{Duration, Utc};

use muster_attendance::domain::types::OTP_TTL_MINUTES;
use muster_attendance::error::AttendanceServiceError;
use muster_attendance::usecase::otp::{
    GenerateOtpInput, GenerateOtpUseCase, ValidateOtpInput, ValidateOtpUseCase,
};
use muster_domain::id::TraineeId;

use crate::helpers::{MockOtpRepo, MockTraineeRepo, code_for};

const TRAINEE: TraineeId = TraineeId(1);
const OTHER: TraineeId = TraineeId(2);

fn generate_uc(otps: MockOtpRepo) -> GenerateOtpUseCase<MockTraineeRepo, MockOtpRepo> {
    GenerateOtpUseCase {
        trainees: MockTraineeRepo::new(vec![TRAINEE, OTHER]),
        otps,
    }
}

// ── Generate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_four_digit_code_for_known_trainee() {
    let repo = MockOtpRepo::empty();
    let codes = repo.codes_handle();
    let uc = generate_uc(repo);

    let before = Utc::now();
    let code = uc
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();

    assert_eq!(code.trainee_id, TRAINEE);
    assert_eq!(code.code.len(), 4);
    assert!(code.code.bytes().all(|b| b.is_ascii_digit()));
    assert!(!code.is_used);
    let ttl = code.expires_at - code.created_at;
    assert_eq!(ttl, Duration::minutes(OTP_TTL_MINUTES));
    assert!(code.created_at >= before);

    let stored = codes.lock().unwrap();
    assert_eq!(stored.len(), 1, "expected exactly one code to be persisted");
    assert_eq!(stored[0], code);
}

#[tokio::test]
async fn should_return_same_code_while_active() {
    let repo = MockOtpRepo::empty();
    let codes = repo.codes_handle();
    let uc = generate_uc(repo);

    let first = uc
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();
    let second = uc
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.expires_at, second.expires_at);
    assert_eq!(codes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_trainee() {
    let uc = generate_uc(MockOtpRepo::empty());

    let result = uc
        .execute(GenerateOtpInput {
            trainee_id: TraineeId(99),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::TraineeNotFound)),
        "expected TraineeNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_sweep_expired_codes_of_all_trainees() {
    let long_ago = Utc::now() - Duration::hours(2);
    let mut used = code_for(OTHER, "1111", long_ago);
    used.is_used = true;
    let repo = MockOtpRepo::new(vec![code_for(OTHER, "2222", long_ago), used]);
    let codes = repo.codes_handle();
    let uc = generate_uc(repo);

    let issued = uc
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();

    let stored = codes.lock().unwrap();
    assert!(
        !stored.iter().any(|c| c.trainee_id == OTHER),
        "expired codes should be swept whether used or not"
    );
    assert_eq!(stored.len(), 1);
    assert!(stored.iter().any(|c| c.code == issued.code && c.trainee_id == TRAINEE));
}

#[tokio::test]
async fn should_treat_swept_used_value_as_invalid() {
    let mut stale = code_for(OTHER, "3141", Utc::now() - Duration::hours(3));
    stale.is_used = true;
    let repo = MockOtpRepo::new(vec![stale]);
    let generate = GenerateOtpUseCase {
        trainees: MockTraineeRepo::new(vec![TRAINEE, OTHER]),
        otps: repo.clone(),
    };
    let issued = generate
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();
    // The fresh draw may collide with the stale value; only the swept row matters here.
    if issued.code == "3141" {
        return;
    }

    let validate = ValidateOtpUseCase { otps: repo };
    let result = validate
        .execute(ValidateOtpInput {
            code: "3141".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
}

#[tokio::test]
async fn should_issue_fresh_code_after_previous_one_is_consumed() {
    let now = Utc::now();
    let mut consumed = code_for(TRAINEE, "4321", now - Duration::minutes(1));
    consumed.is_used = true;
    let repo = MockOtpRepo::new(vec![consumed]);
    let codes = repo.codes_handle();
    let uc = generate_uc(repo);

    let issued = uc
        .execute(GenerateOtpInput {
            trainee_id: TRAINEE,
        })
        .await
        .unwrap();

    assert!(!issued.is_used);
    assert!(issued.created_at >= now);
    assert_eq!(codes.lock().unwrap().len(), 2);
}

// ── Validate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_validate_once_then_report_already_used() {
    let repo = MockOtpRepo::new(vec![code_for(TRAINEE, "0420", Utc::now())]);
    let codes = repo.codes_handle();
    let uc = ValidateOtpUseCase { otps: repo };

    let trainee = uc
        .execute(ValidateOtpInput {
            code: "0420".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(trainee, TRAINEE);
    assert!(codes.lock().unwrap()[0].is_used);

    let again = uc
        .execute(ValidateOtpInput {
            code: "0420".to_owned(),
        })
        .await;
    assert!(
        matches!(again, Err(AttendanceServiceError::OtpAlreadyUsed)),
        "expected OtpAlreadyUsed, got {again:?}"
    );
}

#[tokio::test]
async fn should_report_expired_then_already_used() {
    let issued = Utc::now() - Duration::minutes(OTP_TTL_MINUTES + 1);
    let repo = MockOtpRepo::new(vec![code_for(TRAINEE, "7777", issued)]);
    let codes = repo.codes_handle();
    let uc = ValidateOtpUseCase { otps: repo };

    let first = uc
        .execute(ValidateOtpInput {
            code: "7777".to_owned(),
        })
        .await;
    assert!(
        matches!(first, Err(AttendanceServiceError::OtpExpired)),
        "expected OtpExpired, got {first:?}"
    );
    assert!(
        codes.lock().unwrap()[0].is_used,
        "expired code is burned by the attempt"
    );

    let second = uc
        .execute(ValidateOtpInput {
            code: "7777".to_owned(),
        })
        .await;
    assert!(matches!(second, Err(AttendanceServiceError::OtpAlreadyUsed)));
}

#[tokio::test]
async fn should_report_invalid_for_unknown_or_blank_code() {
    let uc = ValidateOtpUseCase {
        otps: MockOtpRepo::new(vec![code_for(TRAINEE, "1234", Utc::now())]),
    };

    for code in ["9999", "   "] {
        let result = uc
            .execute(ValidateOtpInput {
                code: code.to_owned(),
            })
            .await;
        assert!(
            matches!(result, Err(AttendanceServiceError::InvalidOtp)),
            "expected InvalidOtp for {code:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_prefer_live_code_over_used_row_with_same_value() {
    let now = Utc::now();
    let mut stale = code_for(OTHER, "5555", now - Duration::minutes(5));
    stale.is_used = true;
    let live = code_for(TRAINEE, "5555", now - Duration::minutes(10));
    let uc = ValidateOtpUseCase {
        otps: MockOtpRepo::new(vec![stale, live]),
    };

    let trainee = uc
        .execute(ValidateOtpInput {
            code: "5555".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(trainee, TRAINEE);
}
