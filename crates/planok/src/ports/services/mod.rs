//! Service Ports
//!
//! Abstract interfaces for external services.

mod password_hasher;

pub use password_hasher::*;
