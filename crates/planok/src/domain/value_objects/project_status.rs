//! ProjectStatus - Lifecycle stage of a real-estate project

use serde::{Deserialize, Serialize};

/// Project status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Planificación")]
    Planning,
    #[serde(rename = "En Construcción")]
    UnderConstruction,
    #[serde(rename = "Terminado")]
    Completed,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Planning,
        ProjectStatus::UnderConstruction,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planificación",
            ProjectStatus::UnderConstruction => "En Construcción",
            ProjectStatus::Completed => "Terminado",
            ProjectStatus::Cancelled => "Cancelado",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown project status: {}", s))
    }
}
