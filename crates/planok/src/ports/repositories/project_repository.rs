//! Project Repository Port
//!
//! Abstract interface for Project persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::contains_ci;
use crate::domain::{errors::DomainError, Project, ProjectStatus};

/// Listing filter for projects
#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub id: Option<Uuid>,
    /// Substring of the name (case-insensitive)
    pub name: Option<String>,
    /// Substring of the location (case-insensitive)
    pub location: Option<String>,
    /// Exact code (case-insensitive)
    pub code: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if self.id.is_some_and(|id| project.id != id) {
            return false;
        }
        if let Some(name) = self.name.as_deref() {
            if !contains_ci(&project.name, name) {
                return false;
            }
        }
        if let Some(location) = self.location.as_deref() {
            if !contains_ci(&project.location, location) {
                return false;
            }
        }
        if let Some(code) = self.code.as_deref() {
            if !project.code.eq_ignore_ascii_case(code) {
                return false;
            }
        }
        if self.status.is_some_and(|status| project.status != status) {
            return false;
        }
        true
    }
}

/// Repository interface for Project entities
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a Project by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError>;

    /// Find a Project by its code
    async fn find_by_code(&self, code: &str) -> Result<Option<Project>, DomainError>;

    /// List projects matching the filter, newest first
    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError>;

    /// Save a Project (insert or update)
    async fn save(&self, project: &Project) -> Result<Project, DomainError>;

    /// Delete a Project and its units
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
