//! Household members, roles and the derived caregiver schedule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::activity::{ActivityRule, ActivityTime, Weekday};
use super::meal::MealPlan;
use super::shopping::ShoppingList;

/// A registered family member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub name: String,
}

/// Role a household member acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Parent,
    Cook,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "Parent",
            Role::Cook => "Cook",
            Role::Driver => "Driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "cook" => Ok(Self::Cook),
            "driver" => Ok(Self::Driver),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// One row of the caregiver schedule: an activity on a given weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub activity: String,
    pub time: ActivityTime,
    pub location: String,
    pub caregiver: String,
    #[serde(default)]
    pub driver_required: bool,
}

impl ScheduleEntry {
    pub fn new(rule: &ActivityRule, day: Weekday) -> Self {
        Self {
            day,
            activity: rule.name.clone(),
            time: rule.time,
            location: rule.location.clone(),
            caregiver: rule.caregiver.clone(),
            driver_required: rule.driver_required,
        }
    }
}

/// Everything the household has stored, as seen by one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdState {
    pub family_members: Vec<String>,
    pub activities: Vec<ActivityRule>,
    pub meal_plan: Option<MealPlan>,
    pub shopping_list: Option<ShoppingList>,
    pub schedule: Vec<ScheduleEntry>,
}
