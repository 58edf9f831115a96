//! Meal plan, shopping list and schedule storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{MealPlan, ScheduleEntry, ShoppingList};

/// Storage for derived household plans. Each save inserts a new row; the
/// `latest_*` methods return the newest one.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn save_meal_plan(&self, plan: &MealPlan) -> RepositoryResult<()>;

    async fn latest_meal_plan(&self) -> RepositoryResult<Option<MealPlan>>;

    async fn save_shopping_list(&self, list: &ShoppingList) -> RepositoryResult<()>;

    async fn latest_shopping_list(&self) -> RepositoryResult<Option<ShoppingList>>;

    async fn save_schedule(&self, schedule: &[ScheduleEntry]) -> RepositoryResult<()>;

    async fn latest_schedule(&self) -> RepositoryResult<Option<Vec<ScheduleEntry>>>;
}
