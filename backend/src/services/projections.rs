//! Read-only views derived from stored household data.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityRule, MealPlan, Role, ScheduleEntry, ShoppingList, Weekday};

const NO_MEAL: &str = "No meal planned";
const MEAL_TYPES: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];

/// One schedule row per (activity, day), sorted by weekday then time.
///
/// The driver only sees activities that need a driver.
pub fn generate_schedule(activities: &[ActivityRule], role: Role) -> Vec<ScheduleEntry> {
    let mut schedule: Vec<ScheduleEntry> = activities
        .iter()
        .filter(|rule| role != Role::Driver || rule.driver_required)
        .flat_map(|rule| rule.days.iter().map(|day| ScheduleEntry::new(rule, *day)))
        .collect();
    schedule.sort_by_key(|entry| (entry.day, entry.time));
    schedule
}

/// Schedule rows handled by `caregiver`.
pub fn caregiver_schedule(schedule: &[ScheduleEntry], caregiver: &str) -> Vec<ScheduleEntry> {
    schedule
        .iter()
        .filter(|entry| entry.caregiver == caregiver)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanRow {
    pub day: Weekday,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// Seven rows, Monday first, with the first three dishes of each day.
pub fn meal_plan_table(plan: &MealPlan) -> Vec<MealPlanRow> {
    plan.iter()
        .map(|(day, meals)| {
            let dish = |index: usize| {
                meals
                    .get(index)
                    .map(|meal| meal.dish.clone())
                    .filter(|dish| !dish.is_empty())
                    .unwrap_or_else(|| NO_MEAL.to_string())
            };
            MealPlanRow {
                day,
                breakfast: dish(0),
                lunch: dish(1),
                dinner: dish(2),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDetail {
    pub meal_type: String,
    pub name: String,
    pub ingredients: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub day: Weekday,
    pub meals: Vec<MealDetail>,
}

/// Every meal with its type and ingredients, for days that have meals.
///
/// Meals past the third are labelled `Meal 4`, `Meal 5`, and so on.
pub fn meal_plan_details(plan: &MealPlan) -> Vec<DayMeals> {
    plan.iter()
        .filter(|(_, meals)| !meals.is_empty())
        .map(|(day, meals)| DayMeals {
            day,
            meals: meals
                .iter()
                .enumerate()
                .map(|(index, meal)| MealDetail {
                    meal_type: MEAL_TYPES
                        .get(index)
                        .map(|label| label.to_string())
                        .unwrap_or_else(|| format!("Meal {}", index + 1)),
                    name: meal.dish.clone(),
                    ingredients: meal
                        .ingredients
                        .clone()
                        .unwrap_or_else(|| "None".to_string()),
                })
                .collect(),
        })
        .collect()
}

/// All items as one list, in section order.
pub fn shopping_list_items(list: &ShoppingList) -> Vec<String> {
    list.flat_items()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityInput, Meal, StoreSection};

    fn rule(name: &str, time: &str, days: &[&str], caregiver: &str) -> ActivityRule {
        ActivityInput::new(name, time, days, "Home", "weekly", caregiver)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_schedule_sorted_by_weekday_then_time() {
        let activities = [
            rule("Swim", "18:00", &["Wednesday", "Monday"], "Alice"),
            rule("Piano", "08:00", &["Wednesday"], "Bob"),
            rule("Chess", "07:00", &["Sunday"], "Bob"),
        ];
        let schedule = generate_schedule(&activities, Role::Parent);
        let rows: Vec<_> = schedule
            .iter()
            .map(|entry| (entry.day, entry.activity.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (Weekday::Monday, "Swim"),
                (Weekday::Wednesday, "Piano"),
                (Weekday::Wednesday, "Swim"),
                (Weekday::Sunday, "Chess"),
            ]
        );
    }

    #[test]
    fn test_driver_schedule_filters_activities() {
        let mut carpool = rule("Soccer", "15:00", &["Monday"], "Alice");
        carpool.driver_required = true;
        let activities = [carpool, rule("Piano", "17:00", &["Monday"], "Bob")];

        assert_eq!(generate_schedule(&activities, Role::Parent).len(), 2);
        let driver = generate_schedule(&activities, Role::Driver);
        assert_eq!(driver.len(), 1);
        assert_eq!(driver[0].activity, "Soccer");
    }

    #[test]
    fn test_caregiver_schedule() {
        let activities = [
            rule("Swim", "18:00", &["Monday"], "Alice"),
            rule("Piano", "08:00", &["Tuesday"], "Bob"),
        ];
        let schedule = generate_schedule(&activities, Role::Parent);
        let bob = caregiver_schedule(&schedule, "Bob");
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].activity, "Piano");
        assert!(caregiver_schedule(&schedule, "Carol").is_empty());
    }

    #[test]
    fn test_meal_plan_table_fills_gaps() {
        let plan = MealPlan::new().with_meals(
            Weekday::Tuesday,
            vec![Meal::new("Porridge", "oats"), Meal::new("Soup", "leeks")],
        );
        let table = meal_plan_table(&plan);

        assert_eq!(table.len(), 7);
        assert_eq!(table[0].day, Weekday::Monday);
        assert_eq!(table[0].breakfast, "No meal planned");
        assert_eq!(table[1].breakfast, "Porridge");
        assert_eq!(table[1].lunch, "Soup");
        assert_eq!(table[1].dinner, "No meal planned");
    }

    #[test]
    fn test_meal_plan_details_labels() {
        let meals = vec![
            Meal::new("Eggs", "eggs"),
            Meal::new("Salad", "lettuce"),
            Meal::new("Curry", "rice, lentils"),
            Meal {
                dish: "Cocoa".to_string(),
                ingredients: None,
                extras: Vec::new(),
            },
        ];
        let details = meal_plan_details(&MealPlan::new().with_meals(Weekday::Friday, meals));

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].day, Weekday::Friday);
        let types: Vec<_> = details[0].meals.iter().map(|m| m.meal_type.as_str()).collect();
        assert_eq!(types, vec!["Breakfast", "Lunch", "Dinner", "Meal 4"]);
        assert_eq!(details[0].meals[3].ingredients, "None");
    }

    #[test]
    fn test_shopping_list_items_in_section_order() {
        let mut list = ShoppingList::new();
        list.push(StoreSection::Other, "saffron");
        list.push(StoreSection::Produce, "garlic");
        list.push(StoreSection::Dairy, "milk");
        assert_eq!(shopping_list_items(&list), vec!["garlic", "milk", "saffron"]);
    }
}
