//! PlanOk Data Models
//!
//! Request/response DTOs. Project and unit payloads use the Spanish
//! field names of the public API (`nombre`, `precio_venta`, ...).

mod auth;
mod project;
mod unit;
mod user;

pub use auth::*;
pub use project::*;
pub use unit::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Accept `1500.5` as well as `"1500.5"`
pub(crate) fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn flexible_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "flexible_f64")] f64);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(n)| n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "flexible_f64")]
        price: f64,
        #[serde(default, deserialize_with = "flexible_f64_opt")]
        area: Option<f64>,
    }

    #[test]
    fn test_flexible_numbers() {
        let p: Priced = serde_json::from_value(json!({"price": "1500.50"})).unwrap();
        assert_eq!(p.price, 1500.5);
        assert_eq!(p.area, None);

        let p: Priced = serde_json::from_value(json!({"price": 10, "area": "75.5"})).unwrap();
        assert_eq!(p.price, 10.0);
        assert_eq!(p.area, Some(75.5));

        assert!(serde_json::from_value::<Priced>(json!({"price": "abc"})).is_err());
    }
}
