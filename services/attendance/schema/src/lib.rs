//! sea-orm entities for the attendance service.
//!
//! `sites` and `trainees` are owned by entity management; this service only
//! reads them (and row-locks `trainees` to serialize per-trainee writes).

pub mod attendance;
pub mod authorized_devices;
pub mod otps;
pub mod sites;
pub mod trainees;
