//! Per-category breakdown of a recalculated project, for charts and reports.

use serde::Serialize;
use uuid::Uuid;

use super::tree::Project;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryShare {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    /// Percentage of the project total, `None` when the total is zero.
    pub share: Option<f64>,
    pub subcategory_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetBreakdown {
    pub total: f64,
    pub categories: Vec<CategoryShare>,
}

impl BudgetBreakdown {
    /// Reads amounts as they are; run a recalculation first for consistent shares.
    pub fn from_project(project: &Project) -> Self {
        let total = project.total_budget;
        let categories = project
            .categories
            .iter()
            .map(|category| CategoryShare {
                id: category.id,
                name: category.name.clone(),
                amount: category.amount,
                share: if total.abs() > f64::EPSILON {
                    Some(category.amount / total * 100.0)
                } else {
                    None
                },
                subcategory_count: category.subcategories.len(),
                line_count: category
                    .subcategories
                    .iter()
                    .map(|sub| sub.lines.len())
                    .sum(),
            })
            .collect();
        Self { total, categories }
    }

    /// The category with the largest amount, first in display order on ties.
    pub fn largest(&self) -> Option<&CategoryShare> {
        self.categories.iter().fold(None, |best, candidate| match best {
            Some(current) if current.amount >= candidate.amount => Some(current),
            _ => Some(candidate),
        })
    }
}
