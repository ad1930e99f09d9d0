//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod project_service;
mod unit_service;
mod user_service;

pub use project_service::{NewProject, ProjectChanges, ProjectSearch, ProjectService};
pub use unit_service::{NewUnit, UnitChanges, UnitService};
pub use user_service::{NewUser, UserChanges, UserService};
