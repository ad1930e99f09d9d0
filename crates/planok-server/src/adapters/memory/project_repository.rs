//! In-memory implementation of ProjectRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use planok::{DomainError, Project, ProjectFilter, ProjectRepository};

use super::InMemoryUnitRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
    units: Option<InMemoryUnitRepository>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cascade project deletes into `units`
    pub fn with_units(units: InMemoryUnitRepository) -> Self {
        Self {
            projects: Arc::default(),
            units: Some(units),
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects.values().find(|p| p.code == code).cloned())
    }

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        let projects = self.projects.read().await;
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn save(&self, project: &Project) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().await;
        if projects
            .values()
            .any(|p| p.id != project.id && p.code == project.code)
        {
            return Err(DomainError::Conflict(
                "A project with this code already exists".to_string(),
            ));
        }
        projects.insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let removed = self.projects.write().await.remove(&id).is_some();
        if removed {
            if let Some(units) = &self.units {
                units.delete_by_project(id).await;
            }
        }
        Ok(removed)
    }
}
