//! Domain Entities
//!
//! Core business objects that represent the domain concepts.

mod project;
mod unit;
mod user;

pub use project::*;
pub use unit::*;
pub use user::*;
