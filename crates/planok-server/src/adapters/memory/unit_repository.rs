//! In-memory implementation of UnitRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use planok::{DomainError, Unit, UnitFilter, UnitRepository};

#[derive(Debug, Default, Clone)]
pub struct InMemoryUnitRepository {
    units: Arc<RwLock<HashMap<Uuid, Unit>>>,
}

impl InMemoryUnitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delete_by_project(&self, project_id: Uuid) {
        self.units
            .write()
            .await
            .retain(|_, unit| unit.project_id != project_id);
    }

    /// Store a unit without going through the service (fixtures)
    pub async fn insert(&self, unit: Unit) {
        self.units.write().await.insert(unit.id, unit);
    }
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unit>, DomainError> {
        Ok(self.units.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &UnitFilter) -> Result<Vec<Unit>, DomainError> {
        let units = self.units.read().await;
        let mut result: Vec<Unit> = units
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(result)
    }

    async fn save(&self, unit: &Unit) -> Result<Unit, DomainError> {
        let mut units = self.units.write().await;
        if units
            .values()
            .any(|u| u.id != unit.id && u.project_id == unit.project_id && u.number == unit.number)
        {
            return Err(DomainError::Conflict(
                "A unit with this number already exists in the project".to_string(),
            ));
        }
        units.insert(unit.id, unit.clone());
        Ok(unit.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.units.write().await.remove(&id).is_some())
    }
}
