//! Role permissions and role-filtered views of household data.
//!
//! | Role   | May                                                  |
//! |--------|------------------------------------------------------|
//! | Parent | everything                                           |
//! | Cook   | view the meal plan and the shopping list             |
//! | Driver | view the driver schedule                             |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{HouseholdState, Role};

/// Something a role may or may not do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ManageFamily,
    ManageActivities,
    PlanMeals,
    ViewMealPlan,
    ViewShoppingList,
    ViewDriverSchedule,
    ViewHistory,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageFamily => "manage family members",
            Permission::ManageActivities => "manage activities",
            Permission::PlanMeals => "plan meals",
            Permission::ViewMealPlan => "view the meal plan",
            Permission::ViewShoppingList => "view the shopping list",
            Permission::ViewDriverSchedule => "view the driver schedule",
            Permission::ViewHistory => "view history",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_allowed(role: Role, permission: Permission) -> bool {
    match role {
        Role::Parent => true,
        Role::Cook => matches!(
            permission,
            Permission::ViewMealPlan | Permission::ViewShoppingList
        ),
        Role::Driver => permission == Permission::ViewDriverSchedule,
    }
}

/// Fail with [`PlannerError::AccessDenied`] unless `role` holds `permission`.
pub fn require(role: Role, permission: Permission) -> PlannerResult<()> {
    if is_allowed(role, permission) {
        Ok(())
    } else {
        tracing::debug!(%role, %permission, "Access denied");
        Err(PlannerError::AccessDenied { role, permission })
    }
}

impl HouseholdState {
    /// The part of the state `role` is allowed to see.
    ///
    /// Parents see everything, cooks only the meal plan and shopping list,
    /// drivers only activities and schedule rows that need a driver.
    pub fn for_role(self, role: Role) -> HouseholdState {
        match role {
            Role::Parent => self,
            Role::Cook => HouseholdState {
                meal_plan: self.meal_plan,
                shopping_list: self.shopping_list,
                ..HouseholdState::default()
            },
            Role::Driver => HouseholdState {
                activities: self
                    .activities
                    .into_iter()
                    .filter(|activity| activity.driver_required)
                    .collect(),
                schedule: self
                    .schedule
                    .into_iter()
                    .filter(|entry| entry.driver_required)
                    .collect(),
                ..HouseholdState::default()
            },
        }
    }
}
