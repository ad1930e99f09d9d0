//! Unit Application Service (Use Case)
//!
//! Unit creation and the sales flow: Available → Reserved → Sold.

use std::sync::Arc;

use uuid::Uuid;

use planok::{
    DomainError, ProjectRepository, Role, Unit, UnitFilter, UnitRepository, UnitStatistics,
    UnitStatus, UnitType, UserRepository,
};

/// Fields for a new unit
#[derive(Debug, Clone)]
pub struct NewUnit {
    pub project_id: Uuid,
    pub number: String,
    pub unit_type: UnitType,
    pub area: f64,
    pub price: f64,
    pub status: Option<UnitStatus>,
}

/// Partial unit update; status may only toggle availability
#[derive(Debug, Clone, Default)]
pub struct UnitChanges {
    pub number: Option<String>,
    pub unit_type: Option<UnitType>,
    pub area: Option<f64>,
    pub price: Option<f64>,
    pub status: Option<UnitStatus>,
}

/// Application service for Unit operations
pub struct UnitService<U, P, R>
where
    U: UnitRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    R: UserRepository + ?Sized,
{
    units: Arc<U>,
    projects: Arc<P>,
    users: Arc<R>,
}

impl<U, P, R> UnitService<U, P, R>
where
    U: UnitRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    R: UserRepository + ?Sized,
{
    pub fn new(units: Arc<U>, projects: Arc<P>, users: Arc<R>) -> Self {
        Self {
            units,
            projects,
            users,
        }
    }

    /// Create a unit inside an existing project
    pub async fn create(&self, input: NewUnit) -> Result<Unit, DomainError> {
        if self.projects.find_by_id(input.project_id).await?.is_none() {
            return Err(DomainError::InvalidProject);
        }
        self.ensure_number_free(input.project_id, &input.number, None)
            .await?;

        let unit = Unit::new(
            input.project_id,
            input.number,
            input.unit_type,
            input.area,
            input.price,
            input.status.unwrap_or_default(),
        )?;

        let saved = self.units.save(&unit).await?;
        tracing::info!(unit_id = %saved.id, project_id = %saved.project_id, "Created unit");
        Ok(saved)
    }

    /// Update descriptive fields; the client reference is never touched here
    pub async fn update(&self, id: Uuid, changes: UnitChanges) -> Result<Unit, DomainError> {
        let mut unit = self.find(id).await?;

        if let Some(number) = changes.number {
            if number != unit.number {
                self.ensure_number_free(unit.project_id, &number, Some(id))
                    .await?;
            }
            unit.number = number;
        }
        if let Some(unit_type) = changes.unit_type {
            unit.unit_type = unit_type;
        }
        if let Some(area) = changes.area {
            unit.area = area;
        }
        if let Some(price) = changes.price {
            unit.price = price;
        }
        match changes.status {
            Some(status) if status != unit.status() => unit.set_availability(status)?,
            _ => {}
        }
        unit.touch();

        let saved = self.units.save(&unit).await?;
        tracing::info!(unit_id = %saved.id, "Updated unit");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Unit>, DomainError> {
        self.units.find_by_id(id).await
    }

    pub async fn list(&self, filter: &UnitFilter) -> Result<Vec<Unit>, DomainError> {
        self.units.list(filter).await
    }

    pub async fn by_project(&self, project_id: Uuid) -> Result<Vec<Unit>, DomainError> {
        self.units.list(&UnitFilter::by_project(project_id)).await
    }

    pub async fn available(&self) -> Result<Vec<Unit>, DomainError> {
        self.units
            .list(&UnitFilter::by_status(UnitStatus::Available))
            .await
    }

    pub async fn by_type(&self, unit_type: UnitType) -> Result<Vec<Unit>, DomainError> {
        self.units
            .list(&UnitFilter {
                unit_type: Some(unit_type),
                ..Default::default()
            })
            .await
    }

    /// Units priced within the inclusive bounds; at least one bound is required
    pub async fn by_price_range(
        &self,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Vec<Unit>, DomainError> {
        if min_price.is_none() && max_price.is_none() {
            return Err(DomainError::Validation(
                "At least one price bound is required".to_string(),
            ));
        }
        self.units
            .list(&UnitFilter {
                min_price,
                max_price,
                ..Default::default()
            })
            .await
    }

    /// Units held or bought by a client
    pub async fn by_client(&self, client_id: Uuid) -> Result<Vec<Unit>, DomainError> {
        self.units
            .list(&UnitFilter {
                client_id: Some(client_id),
                ..Default::default()
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.units.delete(id).await?;
        if deleted {
            tracing::info!(unit_id = %id, "Deleted unit");
        }
        Ok(deleted)
    }

    /// Hold an available unit for a client
    pub async fn reserve(&self, unit_id: Uuid, client_id: Uuid) -> Result<Unit, DomainError> {
        let mut unit = self.find(unit_id).await?;
        if !unit.is_available() {
            return Err(DomainError::UnitNotAvailable);
        }

        match self.users.find_by_id(client_id).await? {
            Some(user) if user.role == Role::Client => {}
            _ => return Err(DomainError::InvalidClient),
        }

        unit.reserve(client_id)?;
        let saved = self.units.save(&unit).await?;
        tracing::info!(unit_id = %unit_id, client_id = %client_id, "Reserved unit");
        Ok(saved)
    }

    /// Close the sale of a reserved unit
    pub async fn mark_sold(&self, unit_id: Uuid) -> Result<Unit, DomainError> {
        let mut unit = self.find(unit_id).await?;

        unit.mark_sold()?;
        let saved = self.units.save(&unit).await?;
        tracing::info!(unit_id = %unit_id, client_id = ?saved.client_id(), "Sold unit");
        Ok(saved)
    }

    /// Unit figures for one project; an unknown project yields empty figures
    pub async fn statistics(&self, project_id: Uuid) -> Result<UnitStatistics, DomainError> {
        let units = self.units.list(&UnitFilter::by_project(project_id)).await?;
        Ok(UnitStatistics::from_units(project_id, &units))
    }

    async fn find(&self, id: Uuid) -> Result<Unit, DomainError> {
        self.units
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", id))
    }

    async fn ensure_number_free(
        &self,
        project_id: Uuid,
        number: &str,
        own_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let existing = self
            .units
            .list(&UnitFilter {
                project_id: Some(project_id),
                number: Some(number.to_string()),
                ..Default::default()
            })
            .await?;
        if existing.iter().any(|u| Some(u.id) != own_id) {
            return Err(DomainError::Conflict(format!(
                "Unit {} already exists in this project",
                number
            )));
        }
        Ok(())
    }
}
