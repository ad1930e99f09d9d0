//! Role - Access level of a user account

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Administrador")]
    Administrator,
    #[default]
    #[serde(rename = "Cliente")]
    Client,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Administrator, Role::Client];

    /// Wire value as stored and exchanged with clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrador",
            Role::Client => "Cliente",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                format!("Role {} is not valid. Must be 'Administrador' or 'Cliente'", s)
            })
    }
}
