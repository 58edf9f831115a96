//! Weekly meal planning.
//!
//! The plan itself comes from a [`MealPlanProvider`]. Its answer is treated as
//! untrusted JSON and normalized into a [`MealPlan`]; when the provider fails
//! or answers with nothing usable, a deterministic plan is derived from the
//! preference text instead.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::OfflineProvider;
use crate::models::{Meal, MealPlan, Weekday};

const MEAL_TYPES: [&str; 3] = ["breakfast", "lunch", "dinner"];
const CUISINES: [&str; 3] = ["italian", "mexican", "indian"];
const DIETS: [&str; 3] = ["vegetarian", "gluten-free", "vegan"];
const STYLES: [&str; 3] = ["spicy", "quick", "low-carb"];

/// Source of generated meal plans.
#[async_trait]
pub trait MealPlanProvider: Send + Sync {
    /// Answer `prompt` with a JSON meal plan.
    async fn request_meal_plan(&self, prompt: &str) -> anyhow::Result<Value>;
}

#[async_trait]
impl MealPlanProvider for OfflineProvider {
    async fn request_meal_plan(&self, _prompt: &str) -> anyhow::Result<Value> {
        anyhow::bail!("no meal plan provider configured")
    }
}

/// Instructions sent to the provider for a free-text preference query.
pub fn meal_plan_prompt(preferences: &str) -> String {
    format!(
        "You are a nutritionist and dietitian. Based on the following user query, create a \
         structured weekly meal plan. The plan should have meals for each day (monday to \
         sunday), with three meals per day (breakfast, lunch, dinner). Each meal is a list of \
         strings: the first string is the dish name, followed by its ingredients. Ensure the \
         meals align with the cuisine, diet restrictions, and preferences mentioned in the \
         query. Use lowercase day names.\n\nQuery: {}",
        preferences
    )
}

/// Turn a provider answer into a meal plan.
///
/// Accepts a plan object, a tool-call envelope `{"args": {...}}`, or a list of
/// envelopes (the first usable one wins). Days that are missing or not lists
/// stay empty; non-string meal parts and empty meals are dropped. Returns
/// `None` if no weekday key is found.
pub fn normalize_meal_plan(value: &Value) -> Option<MealPlan> {
    match value {
        Value::Array(calls) => calls.iter().find_map(normalize_meal_plan),
        Value::Object(object) => match object.get("args") {
            Some(args) => normalize_meal_plan(args),
            None => plan_from_object(object),
        },
        _ => None,
    }
}

fn plan_from_object(object: &Map<String, Value>) -> Option<MealPlan> {
    if !Weekday::ALL.iter().any(|day| object.contains_key(day.as_key())) {
        return None;
    }

    let mut plan = MealPlan::new();
    for day in Weekday::ALL {
        let Some(Value::Array(meals)) = object.get(day.as_key()) else {
            continue;
        };
        let meals = meals
            .iter()
            .filter_map(|meal| match meal {
                Value::Array(parts) => {
                    let parts: Vec<String> = parts
                        .iter()
                        .filter_map(|part| part.as_str().map(str::to_string))
                        .collect();
                    (!parts.is_empty()).then(|| Meal::from(parts))
                }
                _ => None,
            })
            .collect();
        plan.set_meals(day, meals);
    }
    Some(plan)
}

/// Deterministic plan built from keywords in `preferences`.
///
/// Looks for a cuisine, a diet and a style among the whitespace-separated
/// words; the last match of each kind wins.
pub fn fallback_meal_plan(preferences: &str) -> MealPlan {
    let mut cuisine = "Italian".to_string();
    let mut diet = "vegetarian".to_string();
    let mut style = "spicy".to_string();

    for word in preferences.to_lowercase().split_whitespace() {
        if CUISINES.contains(&word) {
            cuisine = word.to_string();
        }
        if DIETS.contains(&word) {
            diet = word.to_string();
        }
        if STYLES.contains(&word) {
            style = word.to_string();
        }
    }

    let meals: Vec<Meal> = MEAL_TYPES
        .iter()
        .map(|meal_type| Meal {
            dish: format!("{} {}", capitalize(&cuisine), capitalize(meal_type)),
            ingredients: Some(format!("{} ingredients", cuisine)),
            extras: vec![diet.clone(), style.clone()],
        })
        .collect();

    Weekday::ALL
        .into_iter()
        .fold(MealPlan::new(), |plan, day| plan.with_meals(day, meals.clone()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ask `provider` for a plan, falling back to [`fallback_meal_plan`].
pub async fn plan_meals(provider: &dyn MealPlanProvider, preferences: &str) -> MealPlan {
    let prompt = meal_plan_prompt(preferences);
    match provider.request_meal_plan(&prompt).await {
        Ok(answer) => match normalize_meal_plan(&answer) {
            Some(plan) => {
                tracing::debug!(meals = plan.meal_count(), "Meal plan received from provider");
                plan
            }
            None => {
                tracing::warn!("Meal plan provider returned an unusable answer, using fallback");
                fallback_meal_plan(preferences)
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "Meal plan provider failed, using fallback");
            fallback_meal_plan(preferences)
        }
    }
}
