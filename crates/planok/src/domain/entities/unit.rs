//! Unit - Sellable property inside a project
//!
//! Status and client reference are private: they change only through the
//! transition methods below, so a freshly created unit can never be
//! `Reserved` or `Sold` without a client.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{UnitStatus, UnitType};

/// Property unit
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Unit {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Unique within the project
    pub number: String,
    pub unit_type: UnitType,
    /// Floor area in square meters, > 0
    pub area: f64,
    /// Sale price, > 0
    pub price: f64,
    status: UnitStatus,
    client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored representation of a unit, used to rebuild it from persistence
#[derive(Debug, Clone)]
pub struct UnitSnapshot {
    pub id: Uuid,
    pub project_id: Uuid,
    pub number: String,
    pub unit_type: UnitType,
    pub area: f64,
    pub price: f64,
    pub status: UnitStatus,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    /// Create a new unit; only `Available` and `Unavailable` are valid starting states
    pub fn new(
        project_id: Uuid,
        number: String,
        unit_type: UnitType,
        area: f64,
        price: f64,
        status: UnitStatus,
    ) -> Result<Self, DomainError> {
        if status.requires_client() {
            return Err(DomainError::Validation(format!(
                "A new unit must be '{}' or '{}'",
                UnitStatus::Available,
                UnitStatus::Unavailable
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            number,
            unit_type,
            area,
            price,
            status,
            client_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored unit as-is
    ///
    /// Persisted data is trusted; it may hold combinations the transitions
    /// cannot produce (a reserved unit whose client was deleted).
    pub fn restore(snapshot: UnitSnapshot) -> Self {
        Self {
            id: snapshot.id,
            project_id: snapshot.project_id,
            number: snapshot.number,
            unit_type: snapshot.unit_type,
            area: snapshot.area,
            price: snapshot.price,
            status: snapshot.status,
            client_id: snapshot.client_id,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn client_id(&self) -> Option<Uuid> {
        self.client_id
    }

    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }

    /// Available → Reserved, holding the unit for `client_id`
    pub fn reserve(&mut self, client_id: Uuid) -> Result<(), DomainError> {
        if self.status != UnitStatus::Available {
            return Err(DomainError::UnitNotAvailable);
        }
        self.status = UnitStatus::Reserved;
        self.client_id = Some(client_id);
        self.touch();
        Ok(())
    }

    /// Reserved → Sold; the client reference is kept
    pub fn mark_sold(&mut self) -> Result<(), DomainError> {
        if self.status != UnitStatus::Reserved {
            return Err(DomainError::UnitNotAvailable);
        }
        if self.client_id.is_none() {
            return Err(DomainError::InvalidClient);
        }
        self.status = UnitStatus::Sold;
        self.touch();
        Ok(())
    }

    /// Toggle between Available and Unavailable
    pub fn set_availability(&mut self, status: UnitStatus) -> Result<(), DomainError> {
        if status.requires_client() {
            return Err(DomainError::Validation(format!(
                "Status '{}' can only be set by reserving or selling the unit",
                status
            )));
        }
        if self.status.requires_client() {
            return Err(DomainError::UnitNotAvailable);
        }
        if self.status != status {
            self.status = status;
            self.touch();
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<UnitSnapshot> for Unit {
    fn from(snapshot: UnitSnapshot) -> Self {
        Unit::restore(snapshot)
    }
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            project_id: unit.project_id,
            number: unit.number.clone(),
            unit_type: unit.unit_type,
            area: unit.area,
            price: unit.price,
            status: unit.status,
            client_id: unit.client_id,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}
