//! Family Planner command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # Calendar and reminders for activities stored in a JSON file
//! planner calendar activities.json 2025-06-09
//!
//! # Meal plan and shopping list for a preference query
//! planner meals Plan a week of Italian vegetarian spicy meals
//!
//! # Seed an in-memory household and print every view of it
//! planner demo 2025-06-14
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.
//!
//! # Environment Variables
//!
//! - `PLANNER_CONFIG`: Path of the TOML configuration file
//! - `REPOSITORY_TYPE`: Repository backend (default: local)
//! - `PLANNER_REFERENCE_DATE`: Default reference date (YYYY-MM-DD)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::fs;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use family_planner::api::{
    ActivityInput, CalendarReport, DemoReport, OfflineProvider, PlannedWeek, PlannerConfig, Role,
};
use family_planner::db::{services, RepositoryFactory};
use family_planner::scheduler;
use family_planner::services::{
    generate_shopping_list, meal_plan_details, meal_plan_table, plan_meals,
    projections::shopping_list_items,
};

const USAGE: &str = "usage:
  planner calendar <activities.json> [YYYY-MM-DD]
  planner meals <preferences...>
  planner demo [YYYY-MM-DD]";

const DEMO_PREFERENCES: &str = "Plan a week of Italian vegetarian spicy meals";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PlannerConfig::load().context("Failed to load configuration")?;

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command\n{}", USAGE);
    };

    match command.as_str() {
        "calendar" => calendar(&config, rest),
        "meals" => meals(rest).await,
        "demo" => demo(&config, rest.first().map(String::as_str)).await,
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Command-line date first, then the configured one, then the default.
fn reference_date<'a>(config: &'a PlannerConfig, arg: Option<&'a str>) -> Option<&'a str> {
    arg.or(config.scheduler.reference_date.as_deref())
}

fn calendar(config: &PlannerConfig, args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("missing activities file\n{}", USAGE);
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let inputs: Vec<ActivityInput> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;

    let date = reference_date(config, args.get(1).map(String::as_str));
    let reference_date = scheduler::parse_reference_date(date)?;
    let overview = scheduler::expand_inputs(&inputs, date)?;
    info!(
        activities = inputs.len(),
        reminders = overview.reminders.len(),
        "Calendar built"
    );

    print_json(&CalendarReport {
        reference_date,
        overview,
    })
}

async fn meals(args: &[String]) -> anyhow::Result<()> {
    let preferences = args.join(" ");
    if preferences.trim().is_empty() {
        bail!("missing meal preferences\n{}", USAGE);
    }

    let meal_plan = plan_meals(&OfflineProvider, &preferences).await;
    let shopping_list = generate_shopping_list(&OfflineProvider, &meal_plan).await;
    print_json(&PlannedWeek {
        meal_plan,
        shopping_list,
    })
}

fn demo_activities() -> Vec<ActivityInput> {
    vec![
        ActivityInput::new(
            "Soccer Practice",
            "15:00",
            &["Monday", "Wednesday"],
            "Community Field",
            "weekly",
            "Alice",
        )
        .with_driver_required(true),
        ActivityInput::new(
            "Piano Lesson",
            "17:30",
            &["Tuesday"],
            "Music School",
            "weekly",
            "Bob",
        ),
        ActivityInput::new(
            "Art Class",
            "10:00",
            &["Saturday"],
            "Art Center",
            "monthly",
            "Alice",
        )
        .with_driver_required(true),
    ]
}

async fn demo(config: &PlannerConfig, date: Option<&str>) -> anyhow::Result<()> {
    let repo = RepositoryFactory::from_config(config)?;
    let role = Role::Parent;

    for member in ["Alice", "Bob", "Charlie"] {
        services::add_family_member(repo.as_ref(), role, member).await?;
    }
    for activity in demo_activities() {
        services::add_activity(repo.as_ref(), role, &activity).await?;
    }
    let week = services::generate_meal_plan(
        repo.as_ref(),
        role,
        &OfflineProvider,
        &OfflineProvider,
        DEMO_PREFERENCES,
    )
    .await?;

    let date = reference_date(config, date);
    let reference_date = scheduler::parse_reference_date(date)?;
    let overview = services::refresh_calendar(repo.as_ref(), date).await?;
    let meal_plan = services::meal_plan(repo.as_ref(), Role::Cook).await?;
    info!(%reference_date, "Demo household ready");

    print_json(&DemoReport {
        state: services::load_state(repo.as_ref(), role).await?,
        calendar: CalendarReport {
            reference_date,
            overview,
        },
        meal_table: meal_plan_table(&meal_plan),
        meal_details: meal_plan_details(&meal_plan),
        shopping_list_items: shopping_list_items(&week.shopping_list),
        driver_schedule: services::driver_schedule(repo.as_ref(), Role::Driver).await?,
    })
}
