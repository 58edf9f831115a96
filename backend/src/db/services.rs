//! Household operations against any repository implementation.
//!
//! Every function takes the acting [`Role`] and checks it before touching
//! the store. Activity writes validate their input first and then rebuild and
//! save the full caregiver schedule, so the stored schedule always matches
//! the stored activities.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::repository::{
    ActivityRepository, Entity, FullRepository, HistoryRepository, PlanRepository, RepositoryError,
    Snapshot, TIMESTAMP_FORMAT,
};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    ActivityInput, ActivityRule, HouseholdState, MealPlan, Role, ScheduleEntry, ShoppingList,
};
use crate::scheduler::{self, ActivityOverview};
use crate::services::meal_planner::{plan_meals, MealPlanProvider};
use crate::services::projections::{generate_schedule, shopping_list_items as flatten};
use crate::services::roles::{require, Permission};
use crate::services::shopping::{generate_shopping_list, ShoppingListCategorizer};

/// Selector for the current data in [`load_snapshot`] and [`entity_timestamps`].
pub const LATEST: &str = "Latest";

/// A freshly generated meal plan and the shopping list derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedWeek {
    pub meal_plan: MealPlan,
    pub shopping_list: ShoppingList,
}

pub async fn health_check(repo: &dyn FullRepository) -> PlannerResult<bool> {
    Ok(repo.health_check().await?)
}

pub async fn add_family_member(
    repo: &dyn FullRepository,
    role: Role,
    name: &str,
) -> PlannerResult<()> {
    require(role, Permission::ManageFamily)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(RepositoryError::validation("Family member name must not be empty")
            .with_operation("add_family_member")
            .with_entity(Entity::FamilyMember.as_str())
            .into());
    }
    repo.save_family_member(name).await?;
    tracing::info!(member = name, "Family member added");
    Ok(())
}

/// Stored activities in insertion order.
async fn activities_oldest_first(repo: &dyn FullRepository) -> PlannerResult<Vec<ActivityRule>> {
    let mut activities = repo.list_activities().await?;
    activities.reverse();
    Ok(activities)
}

async fn regenerate_schedule(repo: &dyn FullRepository) -> PlannerResult<Vec<ScheduleEntry>> {
    let activities = activities_oldest_first(repo).await?;
    let schedule = generate_schedule(&activities, Role::Parent);
    repo.save_schedule(&schedule).await?;
    tracing::debug!(entries = schedule.len(), "Schedule regenerated");
    Ok(schedule)
}

/// Store a new activity and return the regenerated schedule.
pub async fn add_activity(
    repo: &dyn FullRepository,
    role: Role,
    input: &ActivityInput,
) -> PlannerResult<Vec<ScheduleEntry>> {
    require(role, Permission::ManageActivities)?;
    let rule = input.validate()?;
    repo.save_activity(&rule).await?;
    tracing::info!(activity = %rule.name, "Activity added");
    regenerate_schedule(repo).await
}

/// Replace the activity called `old_name` and return the regenerated schedule.
pub async fn edit_activity(
    repo: &dyn FullRepository,
    role: Role,
    old_name: &str,
    input: &ActivityInput,
) -> PlannerResult<Vec<ScheduleEntry>> {
    require(role, Permission::ManageActivities)?;
    let rule = input.validate()?;

    let exists = repo
        .list_activities()
        .await?
        .iter()
        .any(|activity| activity.name == old_name);
    if !exists {
        return Err(PlannerError::NotFound(format!("Activity '{}'", old_name)));
    }

    let removed = repo.replace_activity(old_name, &rule).await?;
    tracing::info!(activity = old_name, new_name = %rule.name, removed, "Activity updated");
    regenerate_schedule(repo).await
}

/// Delete every activity called `name` and return the regenerated schedule.
pub async fn delete_activity(
    repo: &dyn FullRepository,
    role: Role,
    name: &str,
) -> PlannerResult<Vec<ScheduleEntry>> {
    require(role, Permission::ManageActivities)?;
    let removed = repo.delete_activity(name).await?;
    if removed == 0 {
        return Err(PlannerError::NotFound(format!("Activity '{}'", name)));
    }
    tracing::info!(activity = name, removed, "Activity deleted");
    regenerate_schedule(repo).await
}

/// Plan the week's meals, derive the shopping list and store both.
pub async fn generate_meal_plan(
    repo: &dyn FullRepository,
    role: Role,
    provider: &dyn MealPlanProvider,
    categorizer: &dyn ShoppingListCategorizer,
    preferences: &str,
) -> PlannerResult<PlannedWeek> {
    require(role, Permission::PlanMeals)?;

    let meal_plan = plan_meals(provider, preferences).await;
    let shopping_list = generate_shopping_list(categorizer, &meal_plan).await;

    repo.save_meal_plan(&meal_plan).await?;
    repo.save_shopping_list(&shopping_list).await?;
    tracing::info!(
        meals = meal_plan.meal_count(),
        items = shopping_list.item_count(),
        "Meal plan and shopping list saved"
    );

    Ok(PlannedWeek {
        meal_plan,
        shopping_list,
    })
}

/// Current household data as seen by `role`.
pub async fn load_state(repo: &dyn FullRepository, role: Role) -> PlannerResult<HouseholdState> {
    let state = HouseholdState {
        family_members: repo
            .list_family_members()
            .await?
            .into_iter()
            .map(|member| member.name)
            .collect(),
        activities: repo.list_activities().await?,
        meal_plan: repo.latest_meal_plan().await?,
        shopping_list: repo.latest_shopping_list().await?,
        schedule: repo.latest_schedule().await?.unwrap_or_default(),
    };
    Ok(state.for_role(role))
}

/// The latest meal plan.
pub async fn meal_plan(repo: &dyn FullRepository, role: Role) -> PlannerResult<MealPlan> {
    require(role, Permission::ViewMealPlan)?;
    repo.latest_meal_plan()
        .await?
        .ok_or_else(|| PlannerError::NotFound("No meal plan found".to_string()))
}

/// Flat list of the latest shopping list's items.
pub async fn shopping_list_items(
    repo: &dyn FullRepository,
    role: Role,
) -> PlannerResult<Vec<String>> {
    require(role, Permission::ViewShoppingList)?;
    let list = repo
        .latest_shopping_list()
        .await?
        .ok_or_else(|| PlannerError::NotFound("No shopping list found".to_string()))?;
    Ok(flatten(&list))
}

/// Schedule of the activities that need a driver.
pub async fn driver_schedule(
    repo: &dyn FullRepository,
    role: Role,
) -> PlannerResult<Vec<ScheduleEntry>> {
    require(role, Permission::ViewDriverSchedule)?;
    let activities = activities_oldest_first(repo).await?;
    Ok(generate_schedule(&activities, Role::Driver))
}

fn parse_entity(entity: &str) -> PlannerResult<Entity> {
    entity
        .parse()
        .map_err(|_| PlannerError::InvalidEntity(entity.to_string()))
}

/// Snapshot selectors for `entity`: [`LATEST`] followed by every stored
/// timestamp, newest first.
pub async fn entity_timestamps(
    repo: &dyn FullRepository,
    role: Role,
    entity: &str,
) -> PlannerResult<Vec<String>> {
    require(role, Permission::ViewHistory)?;
    let entity = parse_entity(entity)?;
    let timestamps = repo.timestamps(entity).await?;

    let mut selectors = Vec::with_capacity(timestamps.len() + 1);
    selectors.push(LATEST.to_string());
    selectors.extend(
        timestamps
            .iter()
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
    );
    Ok(selectors)
}

/// Load `entity` as of `selector`: [`LATEST`] or a `YYYY-MM-DD HH:MM:SS`
/// timestamp returned by [`entity_timestamps`].
pub async fn load_snapshot(
    repo: &dyn FullRepository,
    role: Role,
    entity: &str,
    selector: &str,
) -> PlannerResult<Snapshot> {
    require(role, Permission::ViewHistory)?;
    let entity = parse_entity(entity)?;

    if selector == LATEST {
        return latest_snapshot(repo, entity).await;
    }

    let at = NaiveDateTime::parse_from_str(selector, TIMESTAMP_FORMAT)
        .map_err(|_| PlannerError::InvalidTimestamp(selector.to_string()))?;
    Ok(repo.snapshot(entity, at).await?)
}

async fn latest_snapshot(repo: &dyn FullRepository, entity: Entity) -> PlannerResult<Snapshot> {
    let missing = || PlannerError::NotFound(format!("No {} stored", entity));
    let snapshot = match entity {
        Entity::FamilyMember => Snapshot::FamilyMembers(
            repo.list_family_members()
                .await?
                .into_iter()
                .map(|member| member.name)
                .collect(),
        ),
        Entity::Activity => Snapshot::Activities(repo.list_activities().await?),
        Entity::MealPlan => Snapshot::MealPlan(repo.latest_meal_plan().await?.ok_or_else(missing)?),
        Entity::ShoppingList => {
            Snapshot::ShoppingList(repo.latest_shopping_list().await?.ok_or_else(missing)?)
        }
        Entity::Schedule => Snapshot::Schedule(repo.latest_schedule().await?.ok_or_else(missing)?),
    };
    Ok(snapshot)
}

/// Run the scheduler over the stored activities.
///
/// `reference_date` is a `YYYY-MM-DD` literal; `None` selects the default
/// reference date.
pub async fn refresh_calendar(
    repo: &dyn FullRepository,
    reference_date: Option<&str>,
) -> PlannerResult<ActivityOverview> {
    let reference_date = scheduler::parse_reference_date(reference_date)?;
    let activities = activities_oldest_first(repo).await?;
    let overview = scheduler::expand(&activities, reference_date);
    tracing::debug!(
        %reference_date,
        reminders = overview.reminders.len(),
        "Calendar refreshed"
    );
    Ok(overview)
}
