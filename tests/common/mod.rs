#![allow(dead_code)]

use chrono::NaiveDate;
use mapocket_core::{budget::Project, currency::CurrencyCode};
use uuid::Uuid;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn empty_project(currency: &str) -> Project {
    Project::new(
        "Test project",
        CurrencyCode::new(currency),
        NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid date"),
    )
}

/// Food → Groceries → [Milk 3.50, Bread 2.20], with no manual amounts anywhere.
pub struct GroceriesFixture {
    pub project: Project,
    pub food: Uuid,
    pub groceries: Uuid,
    pub milk: Uuid,
    pub bread: Uuid,
}

pub fn groceries_fixture() -> GroceriesFixture {
    let mut project = empty_project("EUR");
    let food = project.add_category("Food").node_id().expect("category id");
    let groceries = project
        .add_subcategory(food, "Groceries")
        .and_then(|node| node.node_id())
        .expect("subcategory id");
    let milk = project
        .add_line(groceries, "Milk", 3.50)
        .and_then(|node| node.node_id())
        .expect("line id");
    let bread = project
        .add_line(groceries, "Bread", 2.20)
        .and_then(|node| node.node_id())
        .expect("line id");
    GroceriesFixture {
        project,
        food,
        groceries,
        milk,
        bread,
    }
}

/// A wider tree mixing derived and manual nodes at every level.
pub fn mixed_project() -> Project {
    let mut project = empty_project("AED");
    let venue = project.add_category("Venue").node_id().expect("id");
    let hall = project
        .add_subcategory(venue, "Hall")
        .and_then(|node| node.node_id())
        .expect("id");
    project.add_line(hall, "Deposit", "AED 1.500,00");
    project.add_line(hall, "Balance", 2250.75);
    let decor = project
        .add_subcategory(venue, "Decor")
        .and_then(|node| node.node_id())
        .expect("id");
    project.set_subcategory_amount(decor, 640.1);

    let travel = project.add_category("Travel").node_id().expect("id");
    project.set_category_amount(travel, "AED 980,40");

    let gifts = project.add_category("Gifts").node_id().expect("id");
    let family = project
        .add_subcategory(gifts, "Family")
        .and_then(|node| node.node_id())
        .expect("id");
    for (idx, amount) in [0.1, 0.2, 0.3, 19.99].iter().enumerate() {
        project.add_line(family, format!("Gift {idx}"), *amount);
    }
    project
}
