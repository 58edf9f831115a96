//! Service layer for household planning.
//!
//! These modules hold the business logic that sits between the stored data
//! and the callers:
//!
//! - [`meal_planner`]: weekly meal plans from a provider, with a fallback
//! - [`shopping`]: shopping lists derived from a meal plan
//! - [`projections`]: schedule, meal table and shopping views
//! - [`roles`]: role permissions and filtered state
//!
//! Orchestration against a repository lives in [`crate::db::services`].

pub mod meal_planner;
pub mod projections;
pub mod roles;
pub mod shopping;

pub use meal_planner::{
    fallback_meal_plan, meal_plan_prompt, normalize_meal_plan, plan_meals, MealPlanProvider,
};
pub use projections::{
    caregiver_schedule, generate_schedule, meal_plan_details, meal_plan_table,
    shopping_list_items, DayMeals, MealDetail, MealPlanRow,
};
pub use roles::{is_allowed, require, Permission};
pub use shopping::{
    collect_ingredients, fallback_shopping_list, generate_shopping_list, normalize_shopping_list,
    shopping_list_prompt, ShoppingListCategorizer,
};

/// A provider that is never reachable.
///
/// Every request fails, so meal plans and shopping lists always come from the
/// deterministic fallbacks. Used when no generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;
