pub mod attendance;
pub mod device;
pub mod health;
pub mod location;
pub mod otp;
pub mod punctuality;
