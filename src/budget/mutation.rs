//! Command dispatch around the project tree.
//!
//! Every [`BudgetCommand`] runs its tree mutator and then exactly one
//! recalculation pass. Keystroke-level amount input is staged and only
//! committed on blur or after a quiet period, so typing does not recalculate.

use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use super::aggregate::recalculate_in_place;
use super::amount::{format_amount, RawAmount};
use super::tree::{NodeRef, Project, ProjectStatus};
use super::view::{CategoryView, ProjectView};
use crate::config::Config;
use crate::currency::DisplayCurrency;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Discrete edits a caller can make to a project tree.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetCommand {
    AddCategory {
        name: String,
    },
    RemoveCategory {
        category_id: Uuid,
    },
    RenameCategory {
        category_id: Uuid,
        name: String,
    },
    SetCategoryAmount {
        category_id: Uuid,
        amount: RawAmount,
    },
    AddSubcategory {
        category_id: Uuid,
        name: String,
    },
    RemoveSubcategory {
        category_id: Uuid,
        subcategory_id: Uuid,
    },
    RenameSubcategory {
        subcategory_id: Uuid,
        name: String,
    },
    SetSubcategoryAmount {
        subcategory_id: Uuid,
        amount: RawAmount,
    },
    AddLine {
        subcategory_id: Uuid,
        name: String,
        amount: RawAmount,
    },
    RemoveLine {
        subcategory_id: Uuid,
        line_id: Uuid,
    },
    ClearLines {
        subcategory_id: Uuid,
    },
    SetLineAmount {
        line_id: Uuid,
        amount: RawAmount,
    },
    SetLineName {
        line_id: Uuid,
        name: String,
    },
    SetStatus {
        status: ProjectStatus,
    },
}

impl BudgetCommand {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetCommand::AddCategory { .. } => "add_category",
            BudgetCommand::RemoveCategory { .. } => "remove_category",
            BudgetCommand::RenameCategory { .. } => "rename_category",
            BudgetCommand::SetCategoryAmount { .. } => "set_category_amount",
            BudgetCommand::AddSubcategory { .. } => "add_subcategory",
            BudgetCommand::RemoveSubcategory { .. } => "remove_subcategory",
            BudgetCommand::RenameSubcategory { .. } => "rename_subcategory",
            BudgetCommand::SetSubcategoryAmount { .. } => "set_subcategory_amount",
            BudgetCommand::AddLine { .. } => "add_line",
            BudgetCommand::RemoveLine { .. } => "remove_line",
            BudgetCommand::ClearLines { .. } => "clear_lines",
            BudgetCommand::SetLineAmount { .. } => "set_line_amount",
            BudgetCommand::SetLineName { .. } => "set_line_name",
            BudgetCommand::SetStatus { .. } => "set_status",
        }
    }

    fn creates_node(&self) -> bool {
        matches!(
            self,
            BudgetCommand::AddCategory { .. }
                | BudgetCommand::AddSubcategory { .. }
                | BudgetCommand::AddLine { .. }
        )
    }
}

/// What the rendering layer needs after a command: the new total and the affected category.
#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    /// `false` when the command referenced a node that no longer exists.
    pub changed: bool,
    pub total_budget: String,
    /// `None` for project-level changes and for a removed category.
    pub category: Option<CategoryView>,
    /// Category of a staged amount committed ahead of the command, when it differs from `category`.
    pub staged_category: Option<CategoryView>,
    pub created: Option<Uuid>,
}

#[derive(Debug, Clone)]
struct PendingEdit {
    line_id: Uuid,
    raw: String,
    last_input: Instant,
}

/// Owns one project for an editing session and serialises every change through [`Self::apply`].
#[derive(Debug)]
pub struct BudgetEditor {
    project: Project,
    currency: DisplayCurrency,
    quiet_period: Duration,
    pending: Option<PendingEdit>,
    recalculations: usize,
}

impl BudgetEditor {
    pub fn new(mut project: Project) -> Self {
        let currency = DisplayCurrency::with_symbol(&project.currency, &project.symbol);
        if project.symbol.trim().is_empty() {
            project.symbol = currency.symbol.clone();
        }
        let mut editor = Self {
            project,
            currency,
            quiet_period: DEFAULT_QUIET_PERIOD,
            pending: None,
            recalculations: 0,
        };
        editor.recalculate();
        editor
    }

    pub fn from_config(project: Project, config: &Config) -> Self {
        Self::new(project).with_quiet_period(config.quiet_period())
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn currency(&self) -> &DisplayCurrency {
        &self.currency
    }

    /// Number of recalculation passes run so far, including the one on open.
    pub fn recalculation_count(&self) -> usize {
        self.recalculations
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> ProjectView {
        ProjectView::build(&self.project, &self.currency)
    }

    /// Ends the session, committing any staged amount first.
    pub fn into_project(mut self) -> Project {
        self.commit_pending();
        self.project
    }

    /// Runs one command followed by one recalculation pass.
    ///
    /// A staged amount is committed first; its category is reported in
    /// [`Refresh::staged_category`] as it stands after the command.
    pub fn apply(&mut self, command: BudgetCommand) -> Refresh {
        let staged_id = self
            .commit_pending()
            .and_then(|flushed| flushed.category)
            .map(|view| view.id);
        let mut refresh = self.dispatch(command);
        let command_category = refresh.category.as_ref().map(|view| view.id);
        refresh.staged_category = staged_id
            .filter(|id| Some(*id) != command_category)
            .and_then(|id| self.project.category(id))
            .map(|category| CategoryView::build(category, &self.currency));
        refresh
    }

    /// Stages keystroke input for a line amount without recalculating.
    ///
    /// Input for a different line commits the previously staged edit; its refresh is returned.
    pub fn input_line_amount(
        &mut self,
        line_id: Uuid,
        raw: impl Into<String>,
        now: Instant,
    ) -> Option<Refresh> {
        let switching = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.line_id != line_id);
        let flushed = if switching { self.commit_pending() } else { None };
        self.pending = Some(PendingEdit {
            line_id,
            raw: raw.into(),
            last_input: now,
        });
        flushed
    }

    /// Commits the staged edit once the quiet period has passed since the last keystroke.
    pub fn poll(&mut self, now: Instant) -> Option<Refresh> {
        let due = self.pending.as_ref().is_some_and(|pending| {
            now.saturating_duration_since(pending.last_input) >= self.quiet_period
        });
        if due {
            self.commit_pending()
        } else {
            None
        }
    }

    /// Commits the staged edit immediately, as when the amount field loses focus.
    pub fn blur(&mut self) -> Option<Refresh> {
        self.commit_pending()
    }

    fn commit_pending(&mut self) -> Option<Refresh> {
        let edit = self.pending.take()?;
        debug!(line = %edit.line_id, "committing staged amount");
        Some(self.dispatch(BudgetCommand::SetLineAmount {
            line_id: edit.line_id,
            amount: RawAmount::Text(edit.raw),
        }))
    }

    fn dispatch(&mut self, command: BudgetCommand) -> Refresh {
        let label = command.label();
        let creates_node = command.creates_node();
        let project = &mut self.project;
        let touched = match command {
            BudgetCommand::AddCategory { name } => Some(project.add_category(name)),
            BudgetCommand::RemoveCategory { category_id } => project.remove_category(category_id),
            BudgetCommand::RenameCategory { category_id, name } => {
                project.rename_category(category_id, name)
            }
            BudgetCommand::SetCategoryAmount {
                category_id,
                amount,
            } => project.set_category_amount(category_id, amount),
            BudgetCommand::AddSubcategory { category_id, name } => {
                project.add_subcategory(category_id, name)
            }
            BudgetCommand::RemoveSubcategory {
                category_id,
                subcategory_id,
            } => project.remove_subcategory(category_id, subcategory_id),
            BudgetCommand::RenameSubcategory {
                subcategory_id,
                name,
            } => project.rename_subcategory(subcategory_id, name),
            BudgetCommand::SetSubcategoryAmount {
                subcategory_id,
                amount,
            } => project.set_subcategory_amount(subcategory_id, amount),
            BudgetCommand::AddLine {
                subcategory_id,
                name,
                amount,
            } => project.add_line(subcategory_id, name, amount),
            BudgetCommand::RemoveLine {
                subcategory_id,
                line_id,
            } => project.remove_line(subcategory_id, line_id),
            BudgetCommand::ClearLines { subcategory_id } => project.clear_lines(subcategory_id),
            BudgetCommand::SetLineAmount { line_id, amount } => {
                project.set_line_amount(line_id, amount)
            }
            BudgetCommand::SetLineName { line_id, name } => project.set_line_name(line_id, name),
            BudgetCommand::SetStatus { status } => Some(project.set_status(status)),
        };

        if touched.is_none() {
            warn!(
                command = label,
                project = %self.project.id,
                "command target not found; tree left unchanged"
            );
        }
        self.recalculate();
        self.refresh(touched, creates_node)
    }

    fn recalculate(&mut self) {
        recalculate_in_place(&mut self.project);
        self.recalculations += 1;
    }

    fn refresh(&self, touched: Option<NodeRef>, creates_node: bool) -> Refresh {
        let category = touched
            .and_then(|node| node.category_id())
            .and_then(|id| self.project.category(id))
            .map(|category| CategoryView::build(category, &self.currency));
        Refresh {
            changed: touched.is_some(),
            total_budget: format_amount(self.project.total_budget, &self.currency),
            category,
            staged_category: None,
            created: if creates_node {
                touched.and_then(|node| node.node_id())
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::currency::CurrencyCode;

    fn editor() -> BudgetEditor {
        let project = Project::new(
            "Birthday",
            CurrencyCode::new("EUR"),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        );
        BudgetEditor::new(project).with_quiet_period(Duration::from_millis(300))
    }

    fn add_line(editor: &mut BudgetEditor) -> (Uuid, Uuid, Uuid) {
        let category = editor
            .apply(BudgetCommand::AddCategory { name: "Food".into() })
            .created
            .unwrap();
        let sub = editor
            .apply(BudgetCommand::AddSubcategory {
                category_id: category,
                name: "Cake".into(),
            })
            .created
            .unwrap();
        let line = editor
            .apply(BudgetCommand::AddLine {
                subcategory_id: sub,
                name: "Sponge".into(),
                amount: 10.0.into(),
            })
            .created
            .unwrap();
        (category, sub, line)
    }

    #[test]
    fn each_command_runs_one_pass() {
        let mut editor = editor();
        assert_eq!(editor.recalculation_count(), 1);
        add_line(&mut editor);
        assert_eq!(editor.recalculation_count(), 4);
    }

    #[test]
    fn refresh_carries_formatted_subtree() {
        let mut editor = editor();
        let (category, _, line) = add_line(&mut editor);
        let refresh = editor.apply(BudgetCommand::SetLineAmount {
            line_id: line,
            amount: "€ 12,40".into(),
        });
        assert!(refresh.changed);
        assert_eq!(refresh.total_budget, "€ 12,40");
        let view = refresh.category.unwrap();
        assert_eq!(view.id, category);
        assert_eq!(view.amount, "€ 12,40");
        assert!(view.is_derived);
        assert_eq!(refresh.created, None);
    }

    #[test]
    fn missing_target_is_reported_unchanged() {
        let mut editor = editor();
        let before = editor.project().clone();
        let refresh = editor.apply(BudgetCommand::RemoveCategory {
            category_id: Uuid::new_v4(),
        });
        assert!(!refresh.changed);
        assert_eq!(editor.project().categories, before.categories);
    }

    #[test]
    fn keystrokes_wait_for_quiet_period() {
        let mut editor = editor();
        let (_, _, line) = add_line(&mut editor);
        let passes = editor.recalculation_count();
        let start = Instant::now();

        assert!(editor.input_line_amount(line, "1", start).is_none());
        assert!(editor.input_line_amount(line, "15", start + Duration::from_millis(100)).is_none());
        assert!(editor.poll(start + Duration::from_millis(200)).is_none());
        assert_eq!(editor.recalculation_count(), passes);

        let refresh = editor.poll(start + Duration::from_millis(450)).unwrap();
        assert_eq!(refresh.total_budget, "€ 15,00");
        assert_eq!(editor.recalculation_count(), passes + 1);
        assert!(editor.poll(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn blur_and_line_switch_commit_staged_edit() {
        let mut editor = editor();
        let (_, sub, first) = add_line(&mut editor);
        let second = editor
            .apply(BudgetCommand::AddLine {
                subcategory_id: sub,
                name: "Candles".into(),
                amount: 2.0.into(),
            })
            .created
            .unwrap();
        let now = Instant::now();

        editor.input_line_amount(first, "20", now);
        let flushed = editor.input_line_amount(second, "3", now).unwrap();
        assert_eq!(flushed.total_budget, "€ 22,00");

        let committed = editor.blur().unwrap();
        assert_eq!(committed.total_budget, "€ 23,00");
        assert!(!editor.has_pending_edit());
    }

    #[test]
    fn apply_commits_staged_edit_first() {
        let mut editor = editor();
        let (_, _, line) = add_line(&mut editor);
        editor.input_line_amount(line, "7", Instant::now());
        editor.apply(BudgetCommand::SetLineName {
            line_id: line,
            name: "Chocolate".into(),
        });
        let project = editor.into_project();
        assert_eq!(project.total_budget, 7.0);
        assert_eq!(project.line(line).unwrap().name, "Chocolate");
    }

    #[test]
    fn staged_edit_in_same_category_is_not_repeated() {
        let mut editor = editor();
        let (category, _, line) = add_line(&mut editor);
        editor.input_line_amount(line, "8", Instant::now());
        let refresh = editor.apply(BudgetCommand::RenameCategory {
            category_id: category,
            name: "Sweets".into(),
        });
        assert_eq!(refresh.category.unwrap().amount, "€ 8,00");
        assert!(refresh.staged_category.is_none());
    }
}
