//! Formatted snapshots handed to the rendering layer.
//!
//! Views mirror the JSON record shape (`projectName`, `totalBudget`,
//! `categories[].subcategories[].lines[]`) with every amount rendered as a
//! display string.

use serde::Serialize;
use uuid::Uuid;

use super::amount::format_amount;
use super::tree::{Category, ExpenseLine, Project, ProjectStatus, Subcategory};
use crate::currency::DisplayCurrency;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: Uuid,
    pub project_name: String,
    pub status: ProjectStatus,
    pub currency: String,
    pub total_budget: String,
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
    pub is_derived: bool,
    pub subcategories: Vec<SubcategoryView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryView {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
    pub is_derived: bool,
    pub lines: Vec<LineView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineView {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
}

impl ProjectView {
    pub fn build(project: &Project, currency: &DisplayCurrency) -> Self {
        Self {
            id: project.id,
            project_name: project.name.clone(),
            status: project.status,
            currency: currency.code.to_string(),
            total_budget: format_amount(project.total_budget, currency),
            categories: project
                .categories
                .iter()
                .map(|category| CategoryView::build(category, currency))
                .collect(),
        }
    }
}

impl CategoryView {
    pub fn build(category: &Category, currency: &DisplayCurrency) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            amount: format_amount(category.amount, currency),
            is_derived: category.is_derived,
            subcategories: category
                .subcategories
                .iter()
                .map(|sub| SubcategoryView::build(sub, currency))
                .collect(),
        }
    }
}

impl SubcategoryView {
    pub fn build(subcategory: &Subcategory, currency: &DisplayCurrency) -> Self {
        Self {
            id: subcategory.id,
            name: subcategory.name.clone(),
            amount: format_amount(subcategory.amount, currency),
            is_derived: subcategory.is_derived,
            lines: subcategory
                .lines
                .iter()
                .map(|line| LineView::build(line, currency))
                .collect(),
        }
    }
}

impl LineView {
    pub fn build(line: &ExpenseLine, currency: &DisplayCurrency) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            amount: format_amount(line.amount, currency),
        }
    }
}
