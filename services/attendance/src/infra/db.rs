use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use muster_attendance_schema::{attendance, authorized_devices, otps, sites, trainees};
use muster_domain::geo::Coordinate;
use muster_domain::id::TraineeId;

use crate::domain::repository::{
    AssignmentRepository, AttendanceRepository, DeviceRepository, OtpRepository,
    TraineeRepository,
};
use crate::domain::types::{
    AttendanceEvent, AttendanceRecord, ConsumedCode, DayWindow, IssueOutcome, OneTimeCode,
    SENTINEL_CHECK_IN, SiteAssignment,
};
use crate::error::AttendanceServiceError;

/// `SELECT … FOR UPDATE` on the trainee row. Serializes every multi-step
/// write for one trainee; `false` if the row does not exist.
async fn lock_trainee(txn: &DatabaseTransaction, id: TraineeId) -> Result<bool, DbErr> {
    let row = trainees::Entity::find_by_id(id.0)
        .lock_exclusive()
        .one(txn)
        .await?;
    Ok(row.is_some())
}

// ── Trainee repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTraineeRepository {
    pub db: DatabaseConnection,
}

impl TraineeRepository for DbTraineeRepository {
    async fn exists(&self, id: TraineeId) -> Result<bool, AttendanceServiceError> {
        let model = trainees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find trainee by id")?;
        Ok(model.is_some())
    }
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError> {
        let result = otps::Entity::delete_many()
            .filter(otps::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("sweep expired otps")?;
        Ok(result.rows_affected)
    }

    async fn issue(
        &self,
        candidate: &OneTimeCode,
        now: DateTime<Utc>,
    ) -> Result<IssueOutcome, AttendanceServiceError> {
        let outcome = self
            .db
            .transaction::<_, IssueOutcome, DbErr>(|txn| {
                let candidate = candidate.clone();
                Box::pin(async move {
                    if !lock_trainee(txn, candidate.trainee_id).await? {
                        return Ok(IssueOutcome::TraineeMissing);
                    }

                    let active = otps::Entity::find()
                        .filter(otps::Column::TraineeId.eq(candidate.trainee_id.0))
                        .filter(otps::Column::IsUsed.eq(false))
                        .filter(otps::Column::ExpiresAt.gt(now))
                        .order_by_desc(otps::Column::CreatedAt)
                        .one(txn)
                        .await?;
                    if let Some(model) = active {
                        return Ok(IssueOutcome::Existing(otp_from_model(model)));
                    }

                    otps::Entity::update_many()
                        .col_expr(otps::Column::IsUsed, Expr::value(true))
                        .filter(otps::Column::TraineeId.eq(candidate.trainee_id.0))
                        .filter(otps::Column::IsUsed.eq(false))
                        .exec(txn)
                        .await?;

                    let model = otps::ActiveModel {
                        trainee_id: Set(candidate.trainee_id.0),
                        otp_code: Set(candidate.code.clone()),
                        created_at: Set(candidate.created_at),
                        expires_at: Set(candidate.expires_at),
                        is_used: Set(false),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    Ok(IssueOutcome::Created(otp_from_model(model)))
                })
            })
            .await
            .context("issue otp")?;
        Ok(outcome)
    }

    async fn consume(&self, code: &str) -> Result<Option<ConsumedCode>, AttendanceServiceError> {
        let code = code.to_owned();
        let consumed = self
            .db
            .transaction::<_, Option<ConsumedCode>, DbErr>(|txn| {
                Box::pin(async move {
                    // Unused rows first, then newest: a live code wins over a
                    // stale used row that happens to share its value.
                    let row = otps::Entity::find()
                        .filter(otps::Column::OtpCode.eq(code))
                        .order_by_asc(otps::Column::IsUsed)
                        .order_by_desc(otps::Column::CreatedAt)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    let Some(row) = row else {
                        return Ok(None);
                    };

                    let result = otps::Entity::update_many()
                        .col_expr(otps::Column::IsUsed, Expr::value(true))
                        .filter(otps::Column::Id.eq(row.id))
                        .filter(otps::Column::IsUsed.eq(false))
                        .exec(txn)
                        .await?;

                    Ok(Some(ConsumedCode {
                        trainee_id: TraineeId(row.trainee_id),
                        expires_at: row.expires_at,
                        was_used: result.rows_affected == 0,
                    }))
                })
            })
            .await
            .context("consume otp")?;
        Ok(consumed)
    }
}

fn otp_from_model(model: otps::Model) -> OneTimeCode {
    OneTimeCode {
        trainee_id: TraineeId(model.trainee_id),
        code: model.otp_code,
        created_at: model.created_at,
        expires_at: model.expires_at,
        is_used: model.is_used,
    }
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn check_in(
        &self,
        trainee_id: TraineeId,
        event: AttendanceEvent,
        day: DayWindow,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let record = self
            .db
            .transaction::<_, Option<AttendanceRecord>, DbErr>(|txn| {
                Box::pin(async move {
                    if !lock_trainee(txn, trainee_id).await? {
                        return Ok(None);
                    }

                    let deleted = attendance::Entity::delete_many()
                        .filter(attendance::Column::TraineeId.eq(trainee_id.0))
                        .filter(in_day(day))
                        .exec(txn)
                        .await?;
                    if deleted.rows_affected > 0 {
                        tracing::debug!(
                            trainee_id = %trainee_id,
                            deleted = deleted.rows_affected,
                            "replaced same-day attendance"
                        );
                    }

                    let model = attendance::ActiveModel {
                        trainee_id: Set(trainee_id.0),
                        check_in_lat: Set(event.position.lat),
                        check_in_long: Set(event.position.long),
                        check_in_date_time: Set(event.at),
                        check_out_lat: Set(None),
                        check_out_long: Set(None),
                        check_out_date_time: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    Ok(Some(attendance_from_model(model)))
                })
            })
            .await
            .context("record check-in")?;
        Ok(record)
    }

    async fn check_out(
        &self,
        trainee_id: TraineeId,
        event: AttendanceEvent,
        day: DayWindow,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let record = self
            .db
            .transaction::<_, Option<AttendanceRecord>, DbErr>(|txn| {
                Box::pin(async move {
                    if !lock_trainee(txn, trainee_id).await? {
                        return Ok(None);
                    }

                    let latest = attendance::Entity::find()
                        .filter(attendance::Column::TraineeId.eq(trainee_id.0))
                        .filter(in_day(day))
                        .order_by_desc(attendance::Column::CheckInDateTime)
                        .one(txn)
                        .await?;

                    let model = match latest {
                        Some(model) => {
                            let mut active = model.into_active_model();
                            active.check_out_lat = Set(Some(event.position.lat));
                            active.check_out_long = Set(Some(event.position.long));
                            active.check_out_date_time = Set(Some(event.at));
                            active.update(txn).await?
                        }
                        None => {
                            attendance::ActiveModel {
                                trainee_id: Set(trainee_id.0),
                                check_in_lat: Set(Coordinate::ORIGIN.lat),
                                check_in_long: Set(Coordinate::ORIGIN.long),
                                check_in_date_time: Set(SENTINEL_CHECK_IN),
                                check_out_lat: Set(Some(event.position.lat)),
                                check_out_long: Set(Some(event.position.long)),
                                check_out_date_time: Set(Some(event.at)),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?
                        }
                    };
                    Ok(Some(attendance_from_model(model)))
                })
            })
            .await
            .context("record check-out")?;
        Ok(record)
    }
}

/// Rows belonging to `day`: check-in inside the window, or a sentinel
/// check-in whose check-out is inside it. Mirrors [`DayWindow::includes`].
fn in_day(day: DayWindow) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(attendance::Column::CheckInDateTime.gte(day.start))
                .add(attendance::Column::CheckInDateTime.lt(day.end)),
        )
        .add(
            Condition::all()
                .add(attendance::Column::CheckInDateTime.eq(SENTINEL_CHECK_IN))
                .add(attendance::Column::CheckInLat.eq(Coordinate::ORIGIN.lat))
                .add(attendance::Column::CheckInLong.eq(Coordinate::ORIGIN.long))
                .add(attendance::Column::CheckOutDateTime.gte(day.start))
                .add(attendance::Column::CheckOutDateTime.lt(day.end)),
        )
}

fn attendance_from_model(model: attendance::Model) -> AttendanceRecord {
    let check_out = match (
        model.check_out_lat,
        model.check_out_long,
        model.check_out_date_time,
    ) {
        (Some(lat), Some(long), Some(at)) => Some(AttendanceEvent {
            position: Coordinate::new(lat, long),
            at,
        }),
        _ => None,
    };
    AttendanceRecord {
        id: model.id,
        trainee_id: TraineeId(model.trainee_id),
        check_in: AttendanceEvent {
            position: Coordinate::new(model.check_in_lat, model.check_in_long),
            at: model.check_in_date_time,
        },
        check_out,
    }
}

// ── Device repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeviceRepository {
    pub db: DatabaseConnection,
}

impl DeviceRepository for DbDeviceRepository {
    async fn secrets_for(
        &self,
        trainee_id: TraineeId,
    ) -> Result<Vec<String>, AttendanceServiceError> {
        let secrets = authorized_devices::Entity::find()
            .select_only()
            .column(authorized_devices::Column::SecretCode)
            .filter(authorized_devices::Column::TraineeId.eq(trainee_id.0))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list device secrets")?;
        Ok(secrets)
    }
}

// ── Assignment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAssignmentRepository {
    pub db: DatabaseConnection,
}

impl AssignmentRepository for DbAssignmentRepository {
    async fn find_assignment(
        &self,
        trainee_id: TraineeId,
    ) -> Result<Option<SiteAssignment>, AttendanceServiceError> {
        let row = trainees::Entity::find_by_id(trainee_id.0)
            .find_also_related(sites::Entity)
            .one(&self.db)
            .await
            .context("find trainee site assignment")?;
        Ok(match row {
            Some((trainee, Some(site))) => Some(SiteAssignment {
                trainee_id,
                home: Coordinate::new(trainee.home_lat, trainee.home_long),
                site: Coordinate::new(site.addr_lat, site.addr_long),
            }),
            _ => None,
        })
    }
}
