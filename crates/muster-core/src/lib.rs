pub mod config;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod serde;
pub mod tracing;
