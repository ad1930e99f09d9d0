//! Project Application Service (Use Case)
//!
//! Orchestrates domain operations for project management.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use planok::{
    DomainError, Project, ProjectFilter, ProjectRepository, ProjectStatistics, ProjectStatus,
    ProjectWithUnits, UnitFilter, UnitRepository,
};

const INVALID_DATES: &str = "Completion date must be on or after the start date";

/// Fields for a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub code: Option<String>,
}

/// Partial project update
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub code: Option<String>,
}

/// Project search criteria; price bounds select projects with at least
/// one unit priced inside them
#[derive(Debug, Clone, Default)]
pub struct ProjectSearch {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub code: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Application service for Project operations
pub struct ProjectService<P: ProjectRepository + ?Sized, U: UnitRepository + ?Sized> {
    projects: Arc<P>,
    units: Arc<U>,
}

impl<P, U> ProjectService<P, U>
where
    P: ProjectRepository + ?Sized,
    U: UnitRepository + ?Sized,
{
    pub fn new(projects: Arc<P>, units: Arc<U>) -> Self {
        Self { projects, units }
    }

    /// Create a project, generating a code when none is given
    pub async fn create(&self, input: NewProject) -> Result<Project, DomainError> {
        if let Some(code) = input.code.as_deref() {
            self.ensure_code_free(code, None).await?;
        }

        let project = Project::new(
            input.name,
            input.description,
            input.location,
            input.start_date,
            input.completion_date,
            input.status.unwrap_or_default(),
            input.code,
        );
        if !project.has_valid_dates() {
            return Err(DomainError::Validation(INVALID_DATES.to_string()));
        }

        let saved = self.projects.save(&project).await?;
        tracing::info!(project_id = %saved.id, code = %saved.code, "Created project");
        Ok(saved)
    }

    /// Merge changes and re-check the date order
    pub async fn update(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DomainError> {
        let mut project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", id))?;

        if let Some(code) = changes.code {
            if code != project.code {
                self.ensure_code_free(&code, Some(id)).await?;
            }
            project.code = code;
        }
        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = description;
        }
        if let Some(location) = changes.location {
            project.location = location;
        }
        if let Some(start_date) = changes.start_date {
            project.start_date = start_date;
        }
        if let Some(completion_date) = changes.completion_date {
            project.completion_date = Some(completion_date);
        }
        if let Some(status) = changes.status {
            project.status = status;
        }
        if !project.has_valid_dates() {
            return Err(DomainError::Validation(INVALID_DATES.to_string()));
        }
        project.updated_at = Utc::now();

        let saved = self.projects.save(&project).await?;
        tracing::info!(project_id = %saved.id, "Updated project");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        self.projects.find_by_id(id).await
    }

    /// Project with its units
    pub async fn get_with_units(&self, id: Uuid) -> Result<Option<ProjectWithUnits>, DomainError> {
        let Some(project) = self.projects.find_by_id(id).await? else {
            return Ok(None);
        };
        let units = self.units.list(&UnitFilter::by_project(id)).await?;
        Ok(Some(ProjectWithUnits { project, units }))
    }

    pub async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        self.projects.list(filter).await
    }

    pub async fn search(&self, search: ProjectSearch) -> Result<Vec<Project>, DomainError> {
        let filter = ProjectFilter {
            id: search.id,
            name: search.name,
            location: search.location,
            code: search.code,
            status: None,
        };
        let projects = self.projects.list(&filter).await?;
        if search.min_price.is_none() && search.max_price.is_none() {
            return Ok(projects);
        }

        let priced = self
            .units
            .list(&UnitFilter {
                min_price: search.min_price,
                max_price: search.max_price,
                ..Default::default()
            })
            .await?;
        let project_ids: HashSet<Uuid> = priced.iter().map(|u| u.project_id).collect();

        Ok(projects
            .into_iter()
            .filter(|p| project_ids.contains(&p.id))
            .collect())
    }

    /// Delete a project together with its units
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.projects.delete(id).await?;
        if deleted {
            tracing::info!(project_id = %id, "Deleted project");
        }
        Ok(deleted)
    }

    pub async fn statistics(&self) -> Result<ProjectStatistics, DomainError> {
        let projects = self.projects.list(&ProjectFilter::default()).await?;
        Ok(ProjectStatistics::from_projects(&projects))
    }

    async fn ensure_code_free(&self, code: &str, own_id: Option<Uuid>) -> Result<(), DomainError> {
        match self.projects.find_by_code(code).await? {
            Some(existing) if Some(existing.id) != own_id => Err(DomainError::Conflict(format!(
                "A project with code {} already exists",
                code
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryProjectRepository, InMemoryUnitRepository};
    use planok::{Unit, UnitStatus, UnitType};

    struct Fixture {
        service: ProjectService<InMemoryProjectRepository, InMemoryUnitRepository>,
        units: InMemoryUnitRepository,
    }

    fn fixture() -> Fixture {
        let units = InMemoryUnitRepository::new();
        let projects = InMemoryProjectRepository::with_units(units.clone());
        Fixture {
            service: ProjectService::new(Arc::new(projects), Arc::new(units.clone())),
            units,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_project(name: &str, code: Option<&str>) -> NewProject {
        NewProject {
            name: name.to_string(),
            description: "Descripción".to_string(),
            location: "Santiago, Chile".to_string(),
            start_date: date("2023-01-01"),
            completion_date: Some(date("2024-12-31")),
            status: None,
            code: code.map(str::to_string),
        }
    }

    async fn add_unit(units: &InMemoryUnitRepository, project_id: Uuid, number: &str, price: f64) {
        let unit = Unit::new(
            project_id,
            number.to_string(),
            UnitType::Apartment,
            60.0,
            price,
            UnitStatus::Available,
        )
        .unwrap();
        units.insert(unit).await;
    }

    #[tokio::test]
    async fn test_create_generates_code() {
        let f = fixture();
        let project = f
            .service
            .create(new_project("Torre Norte", None))
            .await
            .unwrap();

        assert!(project.code.starts_with("TOR-"));
        assert_eq!(project.status, ProjectStatus::Planning);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let f = fixture();
        f.service
            .create(new_project("Torre Norte", Some("TOR-00001")))
            .await
            .unwrap();

        let result = f
            .service
            .create(new_project("Torre Sur", Some("TOR-00001")))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_dates() {
        let f = fixture();
        let mut input = new_project("Torre Norte", None);
        input.start_date = date("2024-01-01");
        input.completion_date = Some(date("2023-12-31"));

        let result = f.service.create(input).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rechecks_dates() {
        let f = fixture();
        let project = f
            .service
            .create(new_project("Torre Norte", None))
            .await
            .unwrap();

        let result = f
            .service
            .update(
                project.id,
                ProjectChanges {
                    start_date: Some(date("2025-06-01")),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let updated = f
            .service
            .update(
                project.id,
                ProjectChanges {
                    status: Some(ProjectStatus::UnderConstruction),
                    code: Some(project.code.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::UnderConstruction);
    }

    #[tokio::test]
    async fn test_search_by_price() {
        let f = fixture();
        let cheap = f.service.create(new_project("Barato", None)).await.unwrap();
        let pricey = f.service.create(new_project("Caro", None)).await.unwrap();
        add_unit(&f.units, cheap.id, "1", 1000.0).await;
        add_unit(&f.units, pricey.id, "1", 9000.0).await;

        let found = f
            .service
            .search(ProjectSearch {
                min_price: Some(5000.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pricey.id);

        let found = f
            .service
            .search(ProjectSearch {
                name: Some("bar".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, cheap.id);
    }

    #[tokio::test]
    async fn test_get_with_units_and_cascade() {
        let f = fixture();
        let project = f.service.create(new_project("Torre", None)).await.unwrap();
        add_unit(&f.units, project.id, "101", 1000.0).await;
        add_unit(&f.units, project.id, "102", 2000.0).await;

        let detail = f.service.get_with_units(project.id).await.unwrap().unwrap();
        assert_eq!(detail.units.len(), 2);

        assert!(f.service.delete(project.id).await.unwrap());
        assert!(f
            .units
            .list(&UnitFilter::by_project(project.id))
            .await
            .unwrap()
            .is_empty());
        assert!(f.service.get_with_units(project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_statistics() {
        let f = fixture();
        let mut input = new_project("Torre", None);
        input.status = Some(ProjectStatus::UnderConstruction);
        f.service.create(input).await.unwrap();
        f.service.create(new_project("Casa", None)).await.unwrap();

        let stats = f.service.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.by_status["Planificación"], 1);
    }
}
