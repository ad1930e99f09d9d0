//! UnitStatus - Sales state of a property unit

use serde::{Deserialize, Serialize};

/// Unit status
///
/// `Available → Reserved → Sold` is the sales flow. `Unavailable` marks a
/// unit withdrawn from sale and can only be toggled with `Available`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum UnitStatus {
    #[default]
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Reservado")]
    Reserved,
    #[serde(rename = "Vendido")]
    Sold,
    #[serde(rename = "No Disponible")]
    Unavailable,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 4] = [
        UnitStatus::Available,
        UnitStatus::Reserved,
        UnitStatus::Sold,
        UnitStatus::Unavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "Disponible",
            UnitStatus::Reserved => "Reservado",
            UnitStatus::Sold => "Vendido",
            UnitStatus::Unavailable => "No Disponible",
        }
    }

    /// Whether the status implies an assigned client
    pub fn requires_client(&self) -> bool {
        matches!(self, UnitStatus::Reserved | UnitStatus::Sold)
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown unit status: {}", s))
    }
}
