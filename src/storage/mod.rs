pub mod json_backend;

use uuid::Uuid;

use crate::{
    budget::Project,
    errors::{BudgetError, Result},
};

/// Abstraction over backends that persist the list of budget projects.
///
/// Backends only move canonical projects in and out; they never recalculate.
pub trait ProjectStorage: Send + Sync {
    fn load_all(&self) -> Result<Vec<Project>>;
    fn save_all(&self, projects: &[Project]) -> Result<()>;

    fn get(&self, id: Uuid) -> Result<Project> {
        self.load_all()?
            .into_iter()
            .find(|project| project.id == id)
            .ok_or(BudgetError::ProjectNotFound(id))
    }

    /// Replaces the stored project with the same id, or appends it.
    fn upsert(&self, project: &Project) -> Result<()> {
        let mut projects = self.load_all()?;
        match projects.iter_mut().find(|stored| stored.id == project.id) {
            Some(stored) => *stored = project.clone(),
            None => projects.push(project.clone()),
        }
        self.save_all(&projects)
    }

    /// Removes a whole project.
    fn delete(&self, id: Uuid) -> Result<()> {
        let mut projects = self.load_all()?;
        let before = projects.len();
        projects.retain(|project| project.id != id);
        if projects.len() == before {
            return Err(BudgetError::ProjectNotFound(id));
        }
        self.save_all(&projects)
    }
}

pub use json_backend::{JsonProjectStore, CURRENT_SCHEMA_VERSION};
