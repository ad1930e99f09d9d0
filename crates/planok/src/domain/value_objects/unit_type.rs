//! UnitType - Kind of sellable property

use serde::{Deserialize, Serialize};

/// Unit type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UnitType {
    #[serde(rename = "Departamento")]
    Apartment,
    #[serde(rename = "Casa")]
    House,
    #[serde(rename = "Oficina")]
    Office,
    #[serde(rename = "Local Comercial")]
    CommercialSpace,
    #[serde(rename = "Terreno")]
    Land,
    #[serde(rename = "Bodega")]
    Storage,
    #[serde(rename = "Estacionamiento")]
    Parking,
}

impl UnitType {
    pub const ALL: [UnitType; 7] = [
        UnitType::Apartment,
        UnitType::House,
        UnitType::Office,
        UnitType::CommercialSpace,
        UnitType::Land,
        UnitType::Storage,
        UnitType::Parking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Apartment => "Departamento",
            UnitType::House => "Casa",
            UnitType::Office => "Oficina",
            UnitType::CommercialSpace => "Local Comercial",
            UnitType::Land => "Terreno",
            UnitType::Storage => "Bodega",
            UnitType::Parking => "Estacionamiento",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::ALL
            .into_iter()
            .find(|unit_type| unit_type.as_str() == s)
            .ok_or_else(|| format!("Unknown unit type: {}", s))
    }
}
