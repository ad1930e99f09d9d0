//! Unit Repository Port
//!
//! Abstract interface for Unit persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Unit, UnitStatus, UnitType};

/// Listing filter for units
#[derive(Debug, Default, Clone)]
pub struct UnitFilter {
    pub project_id: Option<Uuid>,
    pub unit_type: Option<UnitType>,
    pub status: Option<UnitStatus>,
    pub client_id: Option<Uuid>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    pub number: Option<String>,
}

impl UnitFilter {
    pub fn by_project(project_id: Uuid) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    pub fn by_status(status: UnitStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, unit: &Unit) -> bool {
        if self.project_id.is_some_and(|id| unit.project_id != id) {
            return false;
        }
        if self.unit_type.is_some_and(|t| unit.unit_type != t) {
            return false;
        }
        if self.status.is_some_and(|s| unit.status() != s) {
            return false;
        }
        if self.client_id.is_some() && unit.client_id() != self.client_id {
            return false;
        }
        if self.min_price.is_some_and(|min| unit.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| unit.price > max) {
            return false;
        }
        if let Some(number) = self.number.as_deref() {
            if unit.number != number {
                return false;
            }
        }
        true
    }
}

/// Repository interface for Unit entities
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Find a Unit by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unit>, DomainError>;

    /// List units matching the filter, ordered by unit number
    async fn list(&self, filter: &UnitFilter) -> Result<Vec<Unit>, DomainError>;

    /// Save a Unit (insert or update)
    async fn save(&self, unit: &Unit) -> Result<Unit, DomainError>;

    /// Delete a Unit by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
