pub mod attendance;
pub mod device;
pub mod geofence;
pub mod otp;
pub mod punctuality;
