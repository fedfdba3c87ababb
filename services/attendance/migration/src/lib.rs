use sea_orm_migration::prelude::*;

mod m20261016_000001_create_sites_and_trainees;
mod m20261016_000002_create_otps;
mod m20261016_000003_create_attendance;
mod m20261016_000004_create_authorized_devices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_sites_and_trainees::Migration),
            Box::new(m20261016_000002_create_otps::Migration),
            Box::new(m20261016_000003_create_attendance::Migration),
            Box::new(m20261016_000004_create_authorized_devices::Migration),
        ]
    }
}
