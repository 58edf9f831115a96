//! Shopping list generation from a meal plan.

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;

use super::OfflineProvider;
use crate::models::{MealPlan, ShoppingList, StoreSection};

/// Sorts ingredients into store sections.
#[async_trait]
pub trait ShoppingListCategorizer: Send + Sync {
    /// Answer `prompt` with a JSON object (or text holding one) keyed by section.
    async fn categorize(&self, prompt: &str) -> anyhow::Result<Value>;
}

#[async_trait]
impl ShoppingListCategorizer for OfflineProvider {
    async fn categorize(&self, _prompt: &str) -> anyhow::Result<Value> {
        anyhow::bail!("no shopping list categorizer configured")
    }
}

/// Every distinct ingredient of the plan, in the order it first appears.
///
/// Ingredient text is split on `", "`; days are walked Monday first.
pub fn collect_ingredients(plan: &MealPlan) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ingredients = Vec::new();

    for (_, meals) in plan.iter() {
        for text in meals.iter().filter_map(|meal| meal.ingredients.as_deref()) {
            for ingredient in text.split(", ").map(str::trim) {
                if !ingredient.is_empty() && seen.insert(ingredient.to_string()) {
                    ingredients.push(ingredient.to_string());
                }
            }
        }
    }
    ingredients
}

pub fn shopping_list_prompt(ingredients: &[String]) -> String {
    format!(
        "You are a meal planning assistant. Given a list of ingredients, categorize them into \
         grocery store sections: Produce, Dairy, Pantry, Bakery, and Other. Return a JSON object \
         with these sections as keys and lists of ingredients as values. If an ingredient \
         doesn't clearly fit a section, place it in 'Other'. Use the provided ingredient names \
         exactly as given.\n\nIngredients: {}\n\nOutput only the JSON object.",
        ingredients.join(", ")
    )
}

/// Turn a categorizer answer into a shopping list.
///
/// The answer may be an object or a string containing one, fenced or not.
/// Section labels are matched case-insensitively; unknown labels land in
/// [`StoreSection::Other`]. Non-string items are dropped.
pub fn normalize_shopping_list(value: &Value) -> Option<ShoppingList> {
    let parsed;
    let object = match value {
        Value::Object(object) => object,
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(embedded_object(text)?).ok()?;
            parsed.as_object()?
        }
        _ => return None,
    };

    let mut list = ShoppingList::new();
    for (label, items) in object {
        let section = StoreSection::from_label(label).unwrap_or(StoreSection::Other);
        if let Value::Array(items) = items {
            for item in items.iter().filter_map(Value::as_str) {
                list.push(section, item);
            }
        }
    }
    Some(list)
}

/// The outermost `{...}` span of `text`.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Every ingredient under `Other`, with all sections present.
pub fn fallback_shopping_list(ingredients: &[String]) -> ShoppingList {
    let mut list = ShoppingList::new();
    for ingredient in ingredients {
        list.push(StoreSection::Other, ingredient.as_str());
    }
    list
}

/// Build the shopping list for `plan`.
///
/// A failing categorizer or an unusable answer yields
/// [`fallback_shopping_list`]. An empty plan never reaches the categorizer.
pub async fn generate_shopping_list(
    categorizer: &dyn ShoppingListCategorizer,
    plan: &MealPlan,
) -> ShoppingList {
    let ingredients = collect_ingredients(plan);
    if ingredients.is_empty() {
        tracing::debug!("Meal plan has no ingredients, returning empty shopping list");
        return ShoppingList::new();
    }

    let prompt = shopping_list_prompt(&ingredients);
    match categorizer.categorize(&prompt).await {
        Ok(answer) => normalize_shopping_list(&answer).unwrap_or_else(|| {
            tracing::warn!("Categorizer returned an unusable answer, using fallback");
            fallback_shopping_list(&ingredients)
        }),
        Err(err) => {
            tracing::warn!(error = %err, "Shopping list categorizer failed, using fallback");
            fallback_shopping_list(&ingredients)
        }
    }
}
