//! Weekly meal plan.
//!
//! On the wire a plan is an object keyed by lower-case weekday names, each
//! holding a list of meals, and each meal is a list of strings:
//! `[dish, ingredients, extra...]`.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::activity::Weekday;

/// A single meal: dish name, ingredient text and any trailing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Meal {
    pub dish: String,
    pub ingredients: Option<String>,
    pub extras: Vec<String>,
}

impl Meal {
    pub fn new(dish: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            dish: dish.into(),
            ingredients: Some(ingredients.into()),
            extras: Vec::new(),
        }
    }
}

impl From<Vec<String>> for Meal {
    fn from(parts: Vec<String>) -> Self {
        let mut parts = parts.into_iter();
        Self {
            dish: parts.next().unwrap_or_default(),
            ingredients: parts.next(),
            extras: parts.collect(),
        }
    }
}

impl From<Meal> for Vec<String> {
    fn from(meal: Meal) -> Self {
        let mut parts = vec![meal.dish];
        if meal.ingredients.is_some() || !meal.extras.is_empty() {
            parts.push(meal.ingredients.unwrap_or_default());
        }
        parts.extend(meal.extras);
        parts
    }
}

/// Meals for each day of the week. All seven days are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    days: BTreeMap<Weekday, Vec<Meal>>,
}

impl MealPlan {
    /// A plan with no meals on any day.
    pub fn new() -> Self {
        Self {
            days: Weekday::ALL.into_iter().map(|day| (day, Vec::new())).collect(),
        }
    }

    pub fn meals(&self, day: Weekday) -> &[Meal] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_meals(&mut self, day: Weekday, meals: Vec<Meal>) {
        self.days.insert(day, meals);
    }

    pub fn with_meals(mut self, day: Weekday, meals: Vec<Meal>) -> Self {
        self.set_meals(day, meals);
        self
    }

    /// Iterate days in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Meal])> {
        self.days.iter().map(|(day, meals)| (*day, meals.as_slice()))
    }

    /// Total number of meals across the week.
    pub fn meal_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.meal_count() == 0
    }
}

impl Default for MealPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for MealPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, meals) in &self.days {
            map.serialize_entry(day.as_key(), meals)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MealPlan {
    /// Unknown keys are ignored and absent days stay empty.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<Meal>>::deserialize(deserializer)?;
        let mut plan = MealPlan::new();
        for (key, meals) in raw {
            if let Some(day) = Weekday::from_key(&key) {
                plan.set_meals(day, meals);
            }
        }
        Ok(plan)
    }
}
