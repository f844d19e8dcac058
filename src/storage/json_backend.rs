use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    budget::{Project, ProjectRecord},
    config::{tmp_path, write_atomic, Config},
    currency::CurrencyCode,
    errors::{BudgetError, Result},
    utils::ensure_dir,
};

use super::ProjectStorage;

const PROJECTS_FILE: &str = "projects.json";

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ProjectsFile {
    schema_version: u8,
    #[serde(default)]
    projects: Vec<Project>,
}

/// Stores every project in a single JSON document, written atomically.
#[derive(Debug, Clone)]
pub struct JsonProjectStore {
    path: PathBuf,
    default_currency: CurrencyCode,
}

impl JsonProjectStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self {
            path: dir.join(PROJECTS_FILE),
            default_currency: CurrencyCode::default(),
        })
    }

    /// Opens the store in the configured data dir, importing with the configured currency.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.resolve_data_dir())?.with_default_currency(config.currency()))
    }

    /// Currency given to imported records that carry none.
    pub fn with_default_currency(mut self, currency: CurrencyCode) -> Self {
        self.default_currency = currency;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts a legacy record, stores it, and returns the recalculated project.
    pub fn import_record(&self, json: &str, today: NaiveDate) -> Result<Project> {
        let project = ProjectRecord::from_json(json)?.into_project(&self.default_currency, today);
        self.upsert(&project)?;
        info!(project = %project.id, name = %project.name, "imported project record");
        Ok(project)
    }
}

impl ProjectStorage for JsonProjectStore {
    fn load_all(&self) -> Result<Vec<Project>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let file: ProjectsFile = serde_json::from_str(&data)?;
        if file.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(BudgetError::StorageError(format!(
                "projects file schema v{} is newer than supported v{}",
                file.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        info!(count = file.projects.len(), path = %self.path.display(), "loaded projects");
        Ok(file.projects)
    }

    fn save_all(&self, projects: &[Project]) -> Result<()> {
        let file = ProjectsFile {
            schema_version: CURRENT_SCHEMA_VERSION,
            projects: projects.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(count = projects.len(), path = %self.path.display(), "saved projects");
        Ok(())
    }
}
