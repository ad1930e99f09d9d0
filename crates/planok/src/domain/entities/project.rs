//! Project - Real-estate development

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Unit;
use crate::domain::value_objects::ProjectStatus;

/// Real-estate project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    /// Unique project code (`PRO-1a2b3c4d`)
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new Project with generated ID and timestamps
    ///
    /// When `code` is `None` one is derived from the name.
    pub fn new(
        name: String,
        description: String,
        location: String,
        start_date: NaiveDate,
        completion_date: Option<NaiveDate>,
        status: ProjectStatus,
        code: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let code = code.unwrap_or_else(|| Self::generate_code(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            location,
            start_date,
            completion_date,
            status,
            code,
            created_at: now,
            updated_at: now,
        }
    }

    /// First three characters of the first word, upper-cased, plus a random suffix
    pub fn generate_code(name: &str) -> String {
        let prefix: String = name
            .split_whitespace()
            .next()
            .unwrap_or("PRJ")
            .chars()
            .take(3)
            .collect::<String>()
            .to_uppercase();
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        format!("{}-{}", prefix, suffix)
    }

    /// Completion date, if set, is not before the start date
    pub fn has_valid_dates(&self) -> bool {
        self.completion_date
            .map_or(true, |end| end >= self.start_date)
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Project detail view with its units
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithUnits {
    #[serde(flatten)]
    pub project: Project,
    pub units: Vec<Unit>,
}
