//! Budget project tree, amount handling, and the recalculation engine.

pub mod aggregate;
pub mod amount;
pub mod common;
pub mod mutation;
pub mod record;
pub mod summary;
pub mod tree;
pub mod view;

pub use aggregate::{recalculate, recalculate_in_place, sum_amounts, RecalcSummary};
pub use amount::{format_amount, parse_amount, round_to, RawAmount};
pub use common::Amounted;
pub use mutation::{BudgetCommand, BudgetEditor, Refresh, DEFAULT_QUIET_PERIOD};
pub use record::ProjectRecord;
pub use summary::{BudgetBreakdown, CategoryShare};
pub use tree::{Category, ExpenseLine, NodeRef, Project, ProjectStatus, Subcategory};
pub use view::{CategoryView, LineView, ProjectView, SubcategoryView};
