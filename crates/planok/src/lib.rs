//! PlanOk Domain Library
//!
//! Core domain types and interfaces for the PlanOk real-estate API.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, Project, Unit)
//!   - `value_objects/`: Enumerations (Role, ProjectStatus, UnitStatus, UnitType)
//!   - `validation/`: Field-level input validators
//!   - `statistics/`: Aggregates over entity sets
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use planok::domain::{Unit, UnitStatus};
//! use planok::ports::UnitRepository;
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    DomainError, FieldError, Input, Project, ProjectStatistics, ProjectStatus, ProjectValidator,
    ProjectWithUnits, Role, Unit, UnitSnapshot, UnitStatistics, UnitStatus, UnitType,
    UnitValidator, User, UserStatistics, UserValidator, ValidationErrors, Validator,
};
pub use ports::{
    PasswordHasher, ProjectFilter, ProjectRepository, UnitFilter, UnitRepository, UserFilter,
    UserRepository,
};
