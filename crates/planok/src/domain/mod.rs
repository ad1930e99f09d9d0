//! Domain Layer
//!
//! Pure domain logic without infrastructure dependencies.
//! Contains entities, value objects, validation, statistics and errors.

pub mod entities;
pub mod errors;
pub mod statistics;
pub mod validation;
pub mod value_objects;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use statistics::*;
pub use validation::*;
pub use value_objects::*;
