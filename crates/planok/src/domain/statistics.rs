//! Aggregate statistics
//!
//! Pure functions over entity slices. Groupings are keyed by wire value
//! and list every known variant, including those with a zero count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Project, Unit, User};
use crate::domain::value_objects::{ProjectStatus, Role, UnitStatus, UnitType};

/// Project counts across the whole portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatistics {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Projects under construction
    pub active_projects: usize,
}

impl ProjectStatistics {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut by_status: BTreeMap<String, usize> = ProjectStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for project in projects {
            *by_status
                .entry(project.status.as_str().to_string())
                .or_default() += 1;
        }
        let active_projects = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::UnderConstruction)
            .count();

        Self {
            total: projects.len(),
            by_status,
            active_projects,
        }
    }
}

/// Unit figures for a single project
///
/// Price aggregates are `None` when the project has no units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStatistics {
    pub project_id: Uuid,
    pub total: usize,
    pub average_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

impl UnitStatistics {
    pub fn from_units(project_id: Uuid, units: &[Unit]) -> Self {
        let mut by_status: BTreeMap<String, usize> = UnitStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut by_type: BTreeMap<String, usize> = UnitType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();

        for unit in units {
            *by_status
                .entry(unit.status().as_str().to_string())
                .or_default() += 1;
            *by_type
                .entry(unit.unit_type.as_str().to_string())
                .or_default() += 1;
        }

        let prices = units.iter().map(|u| u.price);
        let min_price = prices.clone().reduce(f64::min);
        let max_price = prices.clone().reduce(f64::max);
        let average_price = if units.is_empty() {
            None
        } else {
            Some(prices.sum::<f64>() / units.len() as f64)
        };

        Self {
            project_id,
            total: units.len(),
            average_price,
            min_price,
            max_price,
            by_status,
            by_type,
        }
    }
}

/// Account counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub total: usize,
    pub active: usize,
    pub clients: usize,
    pub administrators: usize,
    /// Share of active accounts, 0 when there are none
    pub active_percentage: f64,
}

impl UserStatistics {
    pub fn from_users(users: &[User]) -> Self {
        let total = users.len();
        let active = users.iter().filter(|u| u.is_active).count();
        let clients = users.iter().filter(|u| u.role == Role::Client).count();
        let administrators = users
            .iter()
            .filter(|u| u.role == Role::Administrator)
            .count();
        let active_percentage = if total == 0 {
            0.0
        } else {
            active as f64 / total as f64 * 100.0
        };

        Self {
            total,
            active,
            clients,
            administrators,
            active_percentage,
        }
    }
}
