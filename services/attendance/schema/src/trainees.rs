use sea_orm::entity::prelude::*;

/// Minimal trainee record: the columns this service needs for existence
/// checks, row locking, and the geofence (home position + site assignment).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub home_lat: f64,
    pub home_long: f64,
    pub site_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sites::Entity",
        from = "Column::SiteId",
        to = "super::sites::Column::Id"
    )]
    Site,
    #[sea_orm(has_many = "super::otps::Entity")]
    Otps,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::authorized_devices::Entity")]
    AuthorizedDevices,
}

impl Related<super::sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<super::otps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Otps.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::authorized_devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthorizedDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
