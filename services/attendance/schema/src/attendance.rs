use sea_orm::entity::prelude::*;

/// One trainee's attendance for one UTC day.
///
/// A check-out without a same-day check-in is stored with check-in position
/// (0, 0) and check-in time at the Unix epoch.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trainee_id: i32,
    pub check_in_lat: f64,
    pub check_in_long: f64,
    pub check_in_date_time: chrono::DateTime<chrono::Utc>,
    pub check_out_lat: Option<f64>,
    pub check_out_long: Option<f64>,
    pub check_out_date_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trainees::Entity",
        from = "Column::TraineeId",
        to = "super::trainees::Column::Id"
    )]
    Trainee,
}

impl Related<super::trainees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trainee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
