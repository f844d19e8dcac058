//! In-memory project tree: categories, subcategories and expense lines.
//!
//! Mutators here only change structure or leaf values. Derived amounts are
//! refreshed by [`crate::budget::aggregate`], never by the tree itself.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::amount::{parse_amount, RawAmount};
use super::common::Amounted;
use crate::currency::{symbol_for, CurrencyCode};

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Completed,
    Archived,
}

/// A budget project and its category tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub total_budget: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub is_derived: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub is_derived: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lines: Vec<ExpenseLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseLine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
}

/// Location of a node touched by a mutator, with the ids of its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Project,
    Category(Uuid),
    Subcategory {
        category_id: Uuid,
        subcategory_id: Uuid,
    },
    Line {
        category_id: Uuid,
        subcategory_id: Uuid,
        line_id: Uuid,
    },
}

impl NodeRef {
    /// The category enclosing the node, if the node sits below project level.
    pub fn category_id(&self) -> Option<Uuid> {
        match self {
            NodeRef::Project => None,
            NodeRef::Category(id) => Some(*id),
            NodeRef::Subcategory { category_id, .. } | NodeRef::Line { category_id, .. } => {
                Some(*category_id)
            }
        }
    }

    pub fn node_id(&self) -> Option<Uuid> {
        match self {
            NodeRef::Project => None,
            NodeRef::Category(id) => Some(*id),
            NodeRef::Subcategory { subcategory_id, .. } => Some(*subcategory_id),
            NodeRef::Line { line_id, .. } => Some(*line_id),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>, currency: CurrencyCode, date: NaiveDate) -> Self {
        let now = Utc::now();
        let symbol = symbol_for(currency.as_str());
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            end_date: None,
            status: ProjectStatus::default(),
            currency,
            symbol,
            total_budget: 0.0,
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Subcategories of a category; empty when the id does not resolve.
    pub fn subcategories_of(&self, category_id: Uuid) -> &[Subcategory] {
        self.category(category_id)
            .map(|category| category.subcategories.as_slice())
            .unwrap_or(&[])
    }

    /// Lines of a subcategory; empty when the id does not resolve.
    pub fn lines_of(&self, subcategory_id: Uuid) -> &[ExpenseLine] {
        self.subcategory(subcategory_id)
            .map(|sub| sub.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn subcategory(&self, id: Uuid) -> Option<&Subcategory> {
        let (cat_idx, sub_idx) = self.subcategory_position(id)?;
        Some(&self.categories[cat_idx].subcategories[sub_idx])
    }

    pub fn line(&self, id: Uuid) -> Option<&ExpenseLine> {
        let (cat_idx, sub_idx, line_idx) = self.line_position(id)?;
        Some(&self.categories[cat_idx].subcategories[sub_idx].lines[line_idx])
    }

    /// Sets the total directly. Only allowed while the project has no categories.
    pub fn set_manual_total(&mut self, amount: impl Into<RawAmount>) -> bool {
        if !self.categories.is_empty() {
            return false;
        }
        self.total_budget = parse_amount(amount);
        self.touch();
        true
    }

    pub fn set_status(&mut self, status: ProjectStatus) -> NodeRef {
        self.status = status;
        self.touch();
        NodeRef::Project
    }

    pub fn add_category(&mut self, name: impl Into<String>) -> NodeRef {
        let category = Category::new(name);
        let id = category.id;
        self.categories.push(category);
        self.touch();
        NodeRef::Category(id)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<NodeRef> {
        let before = self.categories.len();
        self.categories.retain(|category| category.id != id);
        if self.categories.len() == before {
            return None;
        }
        self.touch();
        Some(NodeRef::Project)
    }

    pub fn rename_category(&mut self, id: Uuid, name: impl Into<String>) -> Option<NodeRef> {
        let category = self.category_mut(id)?;
        category.name = name.into();
        self.touch();
        Some(NodeRef::Category(id))
    }

    /// Manual amount for a category without subcategories. Derived categories are left alone.
    pub fn set_category_amount(
        &mut self,
        id: Uuid,
        amount: impl Into<RawAmount>,
    ) -> Option<NodeRef> {
        let category = self.category_mut(id)?;
        if !category.subcategories.is_empty() {
            return None;
        }
        category.amount = parse_amount(amount);
        self.touch();
        Some(NodeRef::Category(id))
    }

    pub fn add_subcategory(
        &mut self,
        category_id: Uuid,
        name: impl Into<String>,
    ) -> Option<NodeRef> {
        let category = self.category_mut(category_id)?;
        let subcategory = Subcategory::new(name);
        let subcategory_id = subcategory.id;
        category.subcategories.push(subcategory);
        self.touch();
        Some(NodeRef::Subcategory {
            category_id,
            subcategory_id,
        })
    }

    pub fn remove_subcategory(
        &mut self,
        category_id: Uuid,
        subcategory_id: Uuid,
    ) -> Option<NodeRef> {
        let category = self.category_mut(category_id)?;
        let before = category.subcategories.len();
        category.subcategories.retain(|sub| sub.id != subcategory_id);
        if category.subcategories.len() == before {
            return None;
        }
        self.touch();
        Some(NodeRef::Category(category_id))
    }

    pub fn rename_subcategory(
        &mut self,
        subcategory_id: Uuid,
        name: impl Into<String>,
    ) -> Option<NodeRef> {
        let (cat_idx, sub_idx) = self.subcategory_position(subcategory_id)?;
        let category = &mut self.categories[cat_idx];
        let category_id = category.id;
        category.subcategories[sub_idx].name = name.into();
        self.touch();
        Some(NodeRef::Subcategory {
            category_id,
            subcategory_id,
        })
    }

    /// Manual amount for a subcategory without lines. Derived subcategories are left alone.
    pub fn set_subcategory_amount(
        &mut self,
        subcategory_id: Uuid,
        amount: impl Into<RawAmount>,
    ) -> Option<NodeRef> {
        let (cat_idx, sub_idx) = self.subcategory_position(subcategory_id)?;
        let category = &mut self.categories[cat_idx];
        let category_id = category.id;
        let subcategory = &mut category.subcategories[sub_idx];
        if !subcategory.lines.is_empty() {
            return None;
        }
        subcategory.amount = parse_amount(amount);
        self.touch();
        Some(NodeRef::Subcategory {
            category_id,
            subcategory_id,
        })
    }

    pub fn add_line(
        &mut self,
        subcategory_id: Uuid,
        name: impl Into<String>,
        amount: impl Into<RawAmount>,
    ) -> Option<NodeRef> {
        let (cat_idx, sub_idx) = self.subcategory_position(subcategory_id)?;
        let category = &mut self.categories[cat_idx];
        let category_id = category.id;
        let line = ExpenseLine::new(name, parse_amount(amount));
        let line_id = line.id;
        category.subcategories[sub_idx].lines.push(line);
        self.touch();
        Some(NodeRef::Line {
            category_id,
            subcategory_id,
            line_id,
        })
    }

    pub fn remove_line(&mut self, subcategory_id: Uuid, line_id: Uuid) -> Option<NodeRef> {
        let (cat_idx, sub_idx) = self.subcategory_position(subcategory_id)?;
        let category = &mut self.categories[cat_idx];
        let category_id = category.id;
        let lines = &mut category.subcategories[sub_idx].lines;
        let before = lines.len();
        lines.retain(|line| line.id != line_id);
        if lines.len() == before {
            return None;
        }
        self.touch();
        Some(NodeRef::Subcategory {
            category_id,
            subcategory_id,
        })
    }

    /// Removes every line of a subcategory in one step. An already empty subcategory is a no-op.
    pub fn clear_lines(&mut self, subcategory_id: Uuid) -> Option<NodeRef> {
        let (cat_idx, sub_idx) = self.subcategory_position(subcategory_id)?;
        let category = &mut self.categories[cat_idx];
        let category_id = category.id;
        let lines = &mut category.subcategories[sub_idx].lines;
        if lines.is_empty() {
            return None;
        }
        lines.clear();
        self.touch();
        Some(NodeRef::Subcategory {
            category_id,
            subcategory_id,
        })
    }

    pub fn set_line_amount(
        &mut self,
        line_id: Uuid,
        amount: impl Into<RawAmount>,
    ) -> Option<NodeRef> {
        let node = self.line_ref(line_id)?;
        let line = self.line_mut(line_id)?;
        line.amount = parse_amount(amount);
        self.touch();
        Some(node)
    }

    pub fn set_line_name(&mut self, line_id: Uuid, name: impl Into<String>) -> Option<NodeRef> {
        let node = self.line_ref(line_id)?;
        let line = self.line_mut(line_id)?;
        line.name = name.into();
        self.touch();
        Some(node)
    }

    fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    fn line_mut(&mut self, id: Uuid) -> Option<&mut ExpenseLine> {
        let (cat_idx, sub_idx, line_idx) = self.line_position(id)?;
        Some(&mut self.categories[cat_idx].subcategories[sub_idx].lines[line_idx])
    }

    fn line_ref(&self, line_id: Uuid) -> Option<NodeRef> {
        let (cat_idx, sub_idx, _) = self.line_position(line_id)?;
        let category = &self.categories[cat_idx];
        Some(NodeRef::Line {
            category_id: category.id,
            subcategory_id: category.subcategories[sub_idx].id,
            line_id,
        })
    }

    fn subcategory_position(&self, id: Uuid) -> Option<(usize, usize)> {
        self.categories
            .iter()
            .enumerate()
            .find_map(|(cat_idx, category)| {
                category
                    .subcategories
                    .iter()
                    .position(|sub| sub.id == id)
                    .map(|sub_idx| (cat_idx, sub_idx))
            })
    }

    fn line_position(&self, id: Uuid) -> Option<(usize, usize, usize)> {
        for (cat_idx, category) in self.categories.iter().enumerate() {
            for (sub_idx, sub) in category.subcategories.iter().enumerate() {
                if let Some(line_idx) = sub.lines.iter().position(|line| line.id == id) {
                    return Some((cat_idx, sub_idx, line_idx));
                }
            }
        }
        None
    }
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: 0.0,
            is_derived: false,
            subcategories: Vec::new(),
        }
    }
}

impl Subcategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: 0.0,
            is_derived: false,
            lines: Vec::new(),
        }
    }
}

impl ExpenseLine {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
        }
    }
}

macro_rules! impl_amounted {
    ($($ty:ty),*) => {
        $(
            impl Amounted for $ty {
                fn amount(&self) -> f64 {
                    self.amount
                }
            }
        )*
    };
}

impl_amounted!(Category, Subcategory, ExpenseLine);

/// Treats a `null` child collection the same as a missing one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new(
            "Trip",
            CurrencyCode::new("EUR"),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
    }

    #[test]
    fn mutators_return_the_touched_path() {
        let mut project = project();
        let NodeRef::Category(food) = project.add_category("Food") else {
            panic!("expected category ref");
        };
        let sub = project.add_subcategory(food, "Groceries").unwrap();
        let NodeRef::Subcategory { subcategory_id, .. } = sub else {
            panic!("expected subcategory ref");
        };
        let line = project.add_line(subcategory_id, "Milk", "€ 3,50").unwrap();

        assert_eq!(line.category_id(), Some(food));
        let line_id = line.node_id().unwrap();
        assert_eq!(project.line(line_id).unwrap().amount, 3.5);
        assert_eq!(project.lines_of(subcategory_id).len(), 1);
        assert_eq!(project.subcategories_of(food).len(), 1);
    }

    #[test]
    fn unknown_ids_leave_tree_unchanged() {
        let mut project = project();
        project.add_category("Food");
        let snapshot = project.clone();
        let missing = Uuid::new_v4();

        assert!(project.remove_category(missing).is_none());
        assert!(project.add_subcategory(missing, "x").is_none());
        assert!(project.add_line(missing, "x", 1.0).is_none());
        assert!(project.set_line_amount(missing, 1.0).is_none());
        assert!(project.set_line_name(missing, "x").is_none());
        assert!(project.remove_line(missing, missing).is_none());
        assert_eq!(project, snapshot);
    }

    #[test]
    fn manual_amount_rejected_on_nodes_with_children() {
        let mut project = project();
        let food = project.add_category("Food").node_id().unwrap();
        assert!(project.set_category_amount(food, 80.0).is_some());
        project.add_subcategory(food, "Groceries");
        assert!(project.set_category_amount(food, 10.0).is_none());
        assert_eq!(project.category(food).unwrap().amount, 80.0);
    }

    #[test]
    fn manual_total_only_without_categories() {
        let mut project = project();
        assert!(project.set_manual_total("1.500,00"));
        assert_eq!(project.total_budget, 1500.0);
        project.add_category("Food");
        assert!(!project.set_manual_total(10.0));
    }

    #[test]
    fn null_children_deserialize_as_empty() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Food",
            "amount": 12.0,
            "isDerived": true,
            "subcategories": null
        });
        let category: Category = serde_json::from_value(json).unwrap();
        assert!(category.subcategories.is_empty());
    }
}
