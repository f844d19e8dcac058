//! Bottom-up recalculation of derived amounts.
//!
//! One pass walks lines → subcategories → categories → project total. A node
//! with children always shows exactly the sum of its children; a node without
//! children keeps whatever amount it already carries, including the last sum it
//! showed before its final child was removed.

use tracing::debug;

use super::amount::finite_or_zero;
use super::common::Amounted;
use super::tree::{Category, Project, Subcategory};

/// Counters describing one recalculation pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecalcSummary {
    pub derived_categories: usize,
    pub manual_categories: usize,
    pub derived_subcategories: usize,
    pub manual_subcategories: usize,
    pub total: f64,
}

/// Returns a recalculated copy of `project`. Names and structure are untouched.
pub fn recalculate(project: &Project) -> Project {
    let mut next = project.clone();
    recalculate_in_place(&mut next);
    next
}

/// Recalculates `project` in place and reports what the pass saw.
pub fn recalculate_in_place(project: &mut Project) -> RecalcSummary {
    let mut summary = RecalcSummary::default();

    for category in &mut project.categories {
        for subcategory in &mut category.subcategories {
            if refresh_subcategory(subcategory) {
                summary.derived_subcategories += 1;
            } else {
                summary.manual_subcategories += 1;
            }
        }
        if refresh_category(category) {
            summary.derived_categories += 1;
        } else {
            summary.manual_categories += 1;
        }
    }

    if !project.categories.is_empty() {
        project.total_budget = sum_amounts(&project.categories);
    } else {
        project.total_budget = finite_or_zero(project.total_budget);
    }
    summary.total = project.total_budget;

    debug!(
        project = %project.id,
        total = summary.total,
        derived_categories = summary.derived_categories,
        derived_subcategories = summary.derived_subcategories,
        "recalculated project"
    );
    summary
}

/// Left fold in display order; non-finite amounts count as zero.
///
/// The running sum saturates at `±f64::MAX`, so the result is always finite.
pub fn sum_amounts<T: Amounted>(items: &[T]) -> f64 {
    items
        .iter()
        .fold(0.0, |acc, item| saturating_add(acc, finite_or_zero(item.amount())))
}

fn saturating_add(acc: f64, amount: f64) -> f64 {
    let sum = acc + amount;
    if sum.is_finite() {
        sum
    } else if sum > 0.0 {
        f64::MAX
    } else {
        f64::MIN
    }
}

fn refresh_subcategory(subcategory: &mut Subcategory) -> bool {
    if subcategory.lines.is_empty() {
        subcategory.is_derived = false;
        subcategory.amount = finite_or_zero(subcategory.amount);
        return false;
    }
    subcategory.amount = sum_amounts(&subcategory.lines);
    subcategory.is_derived = true;
    true
}

fn refresh_category(category: &mut Category) -> bool {
    if category.subcategories.is_empty() {
        category.is_derived = false;
        category.amount = finite_or_zero(category.amount);
        return false;
    }
    category.amount = sum_amounts(&category.subcategories);
    category.is_derived = true;
    true
}
