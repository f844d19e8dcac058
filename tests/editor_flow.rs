mod common;

use std::time::{Duration, Instant};

use common::{empty_project, groceries_fixture};
use mapocket_core::budget::{BudgetCommand, BudgetEditor, ProjectStatus};
use uuid::Uuid;

#[test]
fn every_command_triggers_exactly_one_pass() {
    let fixture = groceries_fixture();
    let mut editor = BudgetEditor::new(fixture.project);
    let commands = vec![
        BudgetCommand::RenameCategory {
            category_id: fixture.food,
            name: "Groceries & Food".into(),
        },
        BudgetCommand::SetLineName {
            line_id: fixture.bread,
            name: "Baguette".into(),
        },
        BudgetCommand::SetLineAmount {
            line_id: fixture.milk,
            amount: 1.25.into(),
        },
        BudgetCommand::RemoveLine {
            subcategory_id: fixture.groceries,
            line_id: Uuid::new_v4(),
        },
        BudgetCommand::SetStatus {
            status: ProjectStatus::Completed,
        },
    ];

    for command in commands {
        let before = editor.recalculation_count();
        editor.apply(command);
        assert_eq!(editor.recalculation_count(), before + 1);
    }
}

#[test]
fn removing_last_category_keeps_total_as_manual_value() {
    let fixture = groceries_fixture();
    let mut editor = BudgetEditor::new(fixture.project);
    let refresh = editor.apply(BudgetCommand::RemoveCategory {
        category_id: fixture.food,
    });
    assert!(refresh.changed);
    assert!(refresh.category.is_none());
    assert_eq!(refresh.total_budget, "€ 5,70");
    assert!(editor.project().categories.is_empty());
}

#[test]
fn derived_amount_cannot_be_overwritten() {
    let fixture = groceries_fixture();
    let mut editor = BudgetEditor::new(fixture.project);
    let refresh = editor.apply(BudgetCommand::SetSubcategoryAmount {
        subcategory_id: fixture.groceries,
        amount: 999.0.into(),
    });
    assert!(!refresh.changed);
    assert_eq!(refresh.total_budget, "€ 5,70");
}

#[test]
fn view_uses_symbol_resolved_once() {
    let mut project = empty_project("JPY");
    let category = project.add_category("Ramen").node_id().unwrap();
    project.set_category_amount(category, "¥ 1200");
    let editor = BudgetEditor::new(project);

    let view = editor.view();
    assert_eq!(view.currency, "JPY");
    assert_eq!(view.total_budget, "¥ 1200");
    assert_eq!(view.categories[0].amount, "¥ 1200");
    assert!(!view.categories[0].is_derived);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["projectName"], "Test project");
    assert_eq!(json["categories"][0]["isDerived"], false);
}

#[test]
fn blank_symbol_is_filled_from_code() {
    let mut project = empty_project("AED");
    project.symbol.clear();
    let editor = BudgetEditor::new(project);
    assert_eq!(editor.currency().symbol, "AED");
    assert_eq!(editor.project().symbol, "AED");
}

#[test]
fn rapid_typing_recalculates_once() {
    let fixture = groceries_fixture();
    let mut editor =
        BudgetEditor::new(fixture.project).with_quiet_period(Duration::from_millis(250));
    let passes = editor.recalculation_count();
    let start = Instant::now();

    for (step, text) in ["1", "12", "12,", "12,5", "12,50"].iter().enumerate() {
        let at = start + Duration::from_millis(step as u64 * 40);
        assert!(editor.input_line_amount(fixture.milk, *text, at).is_none());
        assert!(editor.poll(at).is_none());
    }
    assert_eq!(editor.recalculation_count(), passes);

    let refresh = editor
        .poll(start + Duration::from_millis(160 + 250))
        .expect("quiet period elapsed");
    assert_eq!(refresh.total_budget, "€ 14,70");
    assert_eq!(editor.recalculation_count(), passes + 1);
}

#[test]
fn staged_edit_in_another_category_is_reported_with_the_command() {
    let fixture = groceries_fixture();
    let mut editor = BudgetEditor::new(fixture.project);
    let travel = editor
        .apply(BudgetCommand::AddCategory {
            name: "Travel".into(),
        })
        .created
        .expect("category id");

    editor.input_line_amount(fixture.milk, "50", Instant::now());
    let refresh = editor.apply(BudgetCommand::RenameCategory {
        category_id: travel,
        name: "Trains".into(),
    });

    let renamed = refresh.category.expect("renamed category");
    assert_eq!(renamed.name, "Trains");
    assert_eq!(renamed.amount, "€ 0,00");
    let food = refresh.staged_category.expect("staged category");
    assert_eq!(food.id, fixture.food);
    assert_eq!(food.amount, "€ 52,20");
    assert_eq!(food.subcategories[0].lines[0].amount, "€ 50,00");
    assert_eq!(refresh.total_budget, "€ 52,20");
}

#[test]
fn staged_edit_in_removed_category_has_no_view() {
    let fixture = groceries_fixture();
    let mut editor = BudgetEditor::new(fixture.project);
    editor.input_line_amount(fixture.bread, "9", Instant::now());
    let refresh = editor.apply(BudgetCommand::RemoveCategory {
        category_id: fixture.food,
    });
    assert!(refresh.category.is_none());
    assert!(refresh.staged_category.is_none());
    assert_eq!(refresh.total_budget, "€ 12,50");
}
