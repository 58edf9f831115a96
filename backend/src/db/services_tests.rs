//! Unit tests for the household service layer.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use super::repositories::{Clock, LocalRepository};
use super::repository::{FullRepository, PlanRepository, RepositoryError, Snapshot};
use super::services::*;
use crate::error::PlannerError;
use crate::models::{ActivityInput, Role, StoreSection, Weekday};
use crate::scheduler::ValidationError;
use crate::services::{MealPlanProvider, OfflineProvider};

fn ticking_clock() -> Clock {
    let base = NaiveDate::from_ymd_opt(2025, 6, 9)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let tick = Arc::new(AtomicI64::new(0));
    Arc::new(move || base + chrono::Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
}

fn repo() -> LocalRepository {
    LocalRepository::with_clock(ticking_clock())
}

fn soccer() -> ActivityInput {
    ActivityInput::new(
        "Soccer Practice",
        "15:00",
        &["Monday", "Wednesday"],
        "Community Field",
        "weekly",
        "Alice",
    )
    .with_driver_required(true)
}

fn piano() -> ActivityInput {
    ActivityInput::new("Piano", "09:00", &["Monday"], "Music School", "weekly", "Bob")
}

struct CannedProvider;

#[async_trait::async_trait]
impl MealPlanProvider for CannedProvider {
    async fn request_meal_plan(&self, _prompt: &str) -> anyhow::Result<serde_json::Value> {
        Ok(json!({"monday": [["Pasta", "spaghetti, garlic"]]}))
    }
}

#[tokio::test]
async fn test_add_activity_regenerates_schedule() {
    let repo = repo();
    add_activity(&repo, Role::Parent, &soccer()).await.unwrap();
    let schedule = add_activity(&repo, Role::Parent, &piano()).await.unwrap();

    let rows: Vec<_> = schedule
        .iter()
        .map(|entry| (entry.day, entry.activity.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Weekday::Monday, "Piano"),
            (Weekday::Monday, "Soccer Practice"),
            (Weekday::Wednesday, "Soccer Practice"),
        ]
    );
    assert_eq!(repo.latest_schedule().await.unwrap(), Some(schedule));
}

#[tokio::test]
async fn test_only_parent_writes() {
    let repo = repo();
    for role in [Role::Cook, Role::Driver] {
        let err = add_activity(&repo, role, &soccer()).await.unwrap_err();
        assert!(err.is_access_denied());
        assert!(add_family_member(&repo, role, "Alice").await.is_err());
        assert!(delete_activity(&repo, role, "Soccer Practice").await.is_err());
    }
    assert_eq!(repo.activity_count(), 0);
}

#[tokio::test]
async fn test_invalid_activity_is_not_stored() {
    let repo = repo();
    let mut input = soccer();
    input.time = Some("3pm".to_string());

    let err = add_activity(&repo, Role::Parent, &input).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::BadTime { .. })
    ));
    assert_eq!(repo.activity_count(), 0);
    assert!(repo.latest_schedule().await.unwrap().is_none());
}

#[tokio::test]
async fn test_edit_and_delete_activity() {
    let repo = repo();
    add_activity(&repo, Role::Parent, &soccer()).await.unwrap();

    let moved = ActivityInput::new(
        "Soccer Match",
        "10:00",
        &["Saturday"],
        "Stadium",
        "weekly",
        "Alice",
    );
    let schedule = edit_activity(&repo, Role::Parent, "Soccer Practice", &moved)
        .await
        .unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].day, Weekday::Saturday);
    assert!(!repo.has_activity("Soccer Practice"));

    let err = edit_activity(&repo, Role::Parent, "Chess", &moved)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let schedule = delete_activity(&repo, Role::Parent, "Soccer Match").await.unwrap();
    assert!(schedule.is_empty());
    assert_eq!(repo.latest_schedule().await.unwrap(), Some(Vec::new()));

    let err = delete_activity(&repo, Role::Parent, "Soccer Match")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_family_member_names_are_trimmed() {
    let repo = repo();
    add_family_member(&repo, Role::Parent, "  Alice ").await.unwrap();
    assert!(add_family_member(&repo, Role::Parent, "   ").await.is_err());

    let state = load_state(&repo, Role::Parent).await.unwrap();
    assert_eq!(state.family_members, vec!["Alice"]);
}

#[tokio::test]
async fn test_generate_meal_plan_saves_plan_and_list() {
    let repo = repo();
    let week = generate_meal_plan(
        &repo,
        Role::Parent,
        &CannedProvider,
        &OfflineProvider,
        "italian",
    )
    .await
    .unwrap();

    assert_eq!(week.meal_plan.meal_count(), 1);
    assert_eq!(
        week.shopping_list.items(StoreSection::Other),
        ["spaghetti", "garlic"]
    );
    assert_eq!(repo.latest_meal_plan().await.unwrap(), Some(week.meal_plan));

    let items = shopping_list_items(&repo, Role::Cook).await.unwrap();
    assert_eq!(items, vec!["spaghetti", "garlic"]);
}

#[tokio::test]
async fn test_meal_plan_falls_back_when_offline() {
    let repo = repo();
    let week = generate_meal_plan(
        &repo,
        Role::Parent,
        &OfflineProvider,
        &OfflineProvider,
        "mexican vegan",
    )
    .await
    .unwrap();

    assert_eq!(week.meal_plan.meal_count(), 21);
    assert_eq!(week.shopping_list.flat_items(), vec!["mexican ingredients"]);
    assert!(generate_meal_plan(&repo, Role::Cook, &OfflineProvider, &OfflineProvider, "")
        .await
        .unwrap_err()
        .is_access_denied());
}

#[tokio::test]
async fn test_meal_plan_view_for_cook_only() {
    let repo = repo();
    let err = meal_plan(&repo, Role::Cook).await.unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    let week = generate_meal_plan(
        &repo,
        Role::Parent,
        &OfflineProvider,
        &OfflineProvider,
        "italian",
    )
    .await
    .unwrap();

    assert_eq!(meal_plan(&repo, Role::Cook).await.unwrap(), week.meal_plan);
    let err = meal_plan(&repo, Role::Driver).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::AccessDenied {
            role: Role::Driver,
            permission: crate::services::Permission::ViewMealPlan,
        }
    ));
}

#[tokio::test]
async fn test_shopping_list_items_requires_a_list() {
    let repo = repo();
    let err = shopping_list_items(&repo, Role::Parent).await.unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    let err = shopping_list_items(&repo, Role::Driver).await.unwrap_err();
    assert!(err.is_access_denied());
}

#[tokio::test]
async fn test_driver_views() {
    let repo = repo();
    add_family_member(&repo, Role::Parent, "Alice").await.unwrap();
    add_activity(&repo, Role::Parent, &soccer()).await.unwrap();
    add_activity(&repo, Role::Parent, &piano()).await.unwrap();

    let schedule = driver_schedule(&repo, Role::Driver).await.unwrap();
    assert_eq!(schedule.len(), 2);
    assert!(schedule.iter().all(|entry| entry.activity == "Soccer Practice"));
    assert_eq!(driver_schedule(&repo, Role::Parent).await.unwrap(), schedule);
    assert!(driver_schedule(&repo, Role::Cook).await.is_err());

    let state = load_state(&repo, Role::Driver).await.unwrap();
    assert!(state.family_members.is_empty());
    assert_eq!(state.activities.len(), 1);
    assert_eq!(state.schedule.len(), 2);
}

#[tokio::test]
async fn test_history_round_trip() {
    let repo = repo();
    add_family_member(&repo, Role::Parent, "Alice").await.unwrap();
    add_family_member(&repo, Role::Parent, "Bob").await.unwrap();

    let selectors = entity_timestamps(&repo, Role::Parent, "FamilyMember")
        .await
        .unwrap();
    assert_eq!(
        selectors,
        vec!["Latest", "2025-06-09 09:30:01", "2025-06-09 09:30:00"]
    );

    let first = load_snapshot(&repo, Role::Parent, "FamilyMember", &selectors[2])
        .await
        .unwrap();
    assert_eq!(first, Snapshot::FamilyMembers(vec!["Alice".to_string()]));

    let latest = load_snapshot(&repo, Role::Parent, "FamilyMember", LATEST)
        .await
        .unwrap();
    assert_eq!(
        latest,
        Snapshot::FamilyMembers(vec!["Bob".to_string(), "Alice".to_string()])
    );
}

#[tokio::test]
async fn test_history_rejects_bad_selectors() {
    let repo = repo();
    let err = entity_timestamps(&repo, Role::Parent, "Recipe")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidEntity(_)));

    let err = load_snapshot(&repo, Role::Parent, "MealPlan", "yesterday")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidTimestamp(_)));

    let err = load_snapshot(&repo, Role::Parent, "MealPlan", LATEST)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = load_snapshot(&repo, Role::Parent, "Schedule", "2025-06-09 09:30:00")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, PlannerError::Repository(RepositoryError::NotFound { .. })));

    assert!(entity_timestamps(&repo, Role::Cook, "MealPlan")
        .await
        .unwrap_err()
        .is_access_denied());
}

#[tokio::test]
async fn test_refresh_calendar_uses_stored_activities() {
    let repo = repo();
    add_activity(&repo, Role::Parent, &soccer()).await.unwrap();

    let overview = refresh_calendar(&repo, Some("2025-06-09")).await.unwrap();
    assert_eq!(overview.entries(Weekday::Monday).len(), 1);
    assert_eq!(overview.reminders.len(), 2);
    assert_eq!(
        overview.reminders[0].message,
        "Reminder: Soccer Practice on Monday, 2025-06-09 at 15:00 at Community Field (Caregiver: Alice)"
    );

    let err = refresh_calendar(&repo, Some("tomorrow")).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::BadReferenceDate { .. })
    ));
}

#[tokio::test]
async fn test_unhealthy_repository_surfaces_errors() {
    let repo = repo();
    repo.set_healthy(false);

    assert!(!health_check(&repo).await.unwrap());
    let err = load_state(&repo, Role::Parent).await.unwrap_err();
    assert!(matches!(err, PlannerError::Repository(ref e) if e.is_retryable()));
}

#[tokio::test]
async fn test_services_accept_trait_objects() {
    let repo: Arc<dyn FullRepository> = Arc::new(repo());
    add_activity(repo.as_ref(), Role::Parent, &piano())
        .await
        .unwrap();
    assert_eq!(
        load_state(repo.as_ref(), Role::Parent)
            .await
            .unwrap()
            .activities
            .len(),
        1
    );
}
