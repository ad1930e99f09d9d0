//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.
//! Each one serializes to the Spanish wire value used by the API and the
//! database (e.g. `UnitStatus::Reserved` ↔ `"Reservado"`).

mod project_status;
mod role;
mod unit_status;
mod unit_type;

pub use project_status::*;
pub use role::*;
pub use unit_status::*;
pub use unit_type::*;
