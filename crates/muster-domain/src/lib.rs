//! Domain types shared across Muster services.
//!
//! Pure value types (trainee ids, coordinates) with no framework
//! dependencies. Every layer of a service may use them; persistence and
//! transport code converts to and from its own representations at the edge.

pub mod geo;
pub mod id;
