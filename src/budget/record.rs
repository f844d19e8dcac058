//! JSON project records as written by earlier versions of the app.
//!
//! Amounts may be numbers or display strings, child collections may be
//! `null`, and most metadata is optional. Conversion parses every amount once
//! and runs a recalculation pass so the result satisfies the tree invariants.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::aggregate::recalculate_in_place;
use super::amount::{parse_amount, RawAmount};
use super::tree::{null_as_empty, Category, ExpenseLine, Project, ProjectStatus, Subcategory};
use crate::currency::CurrencyCode;
use crate::errors::{BudgetError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(alias = "name")]
    pub project_name: String,
    #[serde(default)]
    pub total_budget: Option<RawAmount>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<CategoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subcategories: Vec<SubcategoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lines: Vec<LineRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: Option<RawAmount>,
}

impl ProjectRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| BudgetError::InvalidInput(err.to_string()))
    }

    /// Builds a recalculated project. `default_currency` and `today` fill in missing metadata.
    pub fn into_project(self, default_currency: &CurrencyCode, today: NaiveDate) -> Project {
        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(CurrencyCode::new)
            .unwrap_or_else(|| default_currency.clone());

        let mut project = Project::new(self.project_name, currency, self.date.unwrap_or(today));
        if let Some(id) = self.id {
            project.id = id;
        }
        project.end_date = self.end_date;
        project.status = self.status.unwrap_or_default();
        project.total_budget = amount_or_zero(self.total_budget);
        project.categories = self
            .categories
            .into_iter()
            .map(CategoryRecord::into_category)
            .collect();

        recalculate_in_place(&mut project);
        project
    }
}

impl CategoryRecord {
    fn into_category(self) -> Category {
        let mut category = Category::new(self.name);
        category.amount = amount_or_zero(self.amount);
        category.subcategories = self
            .subcategories
            .into_iter()
            .map(SubcategoryRecord::into_subcategory)
            .collect();
        category
    }
}

impl SubcategoryRecord {
    fn into_subcategory(self) -> Subcategory {
        let mut subcategory = Subcategory::new(self.name);
        subcategory.amount = amount_or_zero(self.amount);
        subcategory.lines = self
            .lines
            .into_iter()
            .map(|line| ExpenseLine::new(line.name, amount_or_zero(line.amount)))
            .collect();
        subcategory
    }
}

fn amount_or_zero(amount: Option<RawAmount>) -> f64 {
    amount.map(parse_amount).unwrap_or(0.0)
}
