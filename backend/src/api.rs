//! Public API surface of the planner.
//!
//! This file consolidates the types callers exchange with the crate. All
//! data types derive Serialize/Deserialize for JSON output.

pub use crate::config::{ConfigError, PlannerConfig};
pub use crate::error::{PlannerError, PlannerResult};
pub use crate::models::{
    ActivityInput, ActivityRule, ActivityTime, DayList, FamilyMember, HouseholdState, Meal,
    MealPlan, Repetition, Role, ScheduleEntry, ShoppingList, StoreSection, Weekday,
};
pub use crate::scheduler::{ActivityOverview, CalendarEntry, ReminderEvent, ValidationError};
pub use crate::services::{
    DayMeals, MealDetail, MealPlanProvider, MealPlanRow, OfflineProvider, Permission,
    ShoppingListCategorizer,
};
pub use crate::db::{Entity, PlannedWeek, Snapshot};

use serde::{Deserialize, Serialize};

/// Output of a calendar run over a list of activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarReport {
    pub reference_date: chrono::NaiveDate,
    #[serde(flatten)]
    pub overview: ActivityOverview,
}

/// Everything the demo command produces for one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoReport {
    pub state: HouseholdState,
    pub calendar: CalendarReport,
    pub meal_table: Vec<MealPlanRow>,
    pub meal_details: Vec<DayMeals>,
    pub shopping_list_items: Vec<String>,
    pub driver_schedule: Vec<ScheduleEntry>,
}
