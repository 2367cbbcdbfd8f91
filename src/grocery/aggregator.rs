use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::repo::GroceryListItem;
use crate::meals::repo::MealIngredientRow;
use crate::plans::repo::MealPlanItem;

/// Category used when an ingredient has none.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A grocery line not yet persisted, ready for bulk insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryItemDraft {
    pub grocery_list_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<GroceryListItem>,
}

/// Walks the plan's items in order and emits one draft per recipe line of
/// each item's meal. Quantities are carried as-is: two meals that both need
/// flour produce two flour lines, never a summed one.
pub fn build(
    plan_items: &[MealPlanItem],
    ingredients_by_meal: &HashMap<Uuid, Vec<MealIngredientRow>>,
    list_id: Uuid,
) -> Vec<GroceryItemDraft> {
    let mut drafts = Vec::new();
    for item in plan_items {
        let Some(lines) = ingredients_by_meal.get(&item.meal_id) else {
            continue;
        };
        for line in lines {
            drafts.push(GroceryItemDraft {
                grocery_list_id: list_id,
                ingredient_id: line.ingredient_id,
                amount: line.amount,
                unit: line.unit.clone(),
            });
        }
    }
    drafts
}

/// Partitions items by ingredient category, groups in first-seen order and
/// items in input order within each group.
pub fn group_by_category(items: Vec<GroceryListItem>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in items {
        let category = item
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category,
                items: vec![item],
            }),
        }
    }
    groups
}

/// The checked flag and nothing else. Callers apply this to their copy only
/// after the store has acknowledged the write.
pub fn toggle(mut item: GroceryListItem, checked: bool) -> GroceryListItem {
    item.is_checked = checked;
    item
}

/// Flat-text rendering of the still-unchecked items, in input order.
pub fn export_text(items: &[GroceryListItem], list_title: &str, generated_on: &str) -> String {
    let lines: Vec<String> = items
        .iter()
        .filter(|item| !item.is_checked)
        .map(|item| {
            let quantity = match item.amount {
                Some(amount) => format!(
                    "{} {}",
                    format_amount(amount),
                    item.unit.as_deref().unwrap_or("")
                ),
                None => String::new(),
            };
            format!("• {} {}", item.ingredient_name, quantity)
                .trim_end()
                .to_string()
        })
        .collect();

    format!(
        "{}\n\nGenerated on: {}\n\n{}",
        list_title,
        generated_on,
        lines.join("\n")
    )
}

/// Download name derived from the list title: non-alphanumerics become
/// underscores, lower-cased, `.txt` appended.
pub fn export_filename(list_title: &str) -> String {
    let slug: String = list_title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{slug}.txt")
}

// Whole amounts print without a trailing ".0" so "1 gal" stays "1 gal".
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn plan_item(meal_id: Uuid) -> MealPlanItem {
        MealPlanItem {
            id: Uuid::new_v4(),
            meal_plan_id: Uuid::new_v4(),
            meal_id,
            day_of_week: 0,
            meal_type: "dinner".into(),
            servings: 2,
            notes: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn recipe_line(meal_id: Uuid, name: &str, amount: Option<f64>, unit: Option<&str>) -> MealIngredientRow {
        MealIngredientRow {
            id: Uuid::new_v4(),
            meal_id,
            ingredient_id: Uuid::new_v4(),
            ingredient_name: name.into(),
            category: None,
            amount,
            unit: unit.map(|u| u.to_string()),
            notes: None,
        }
    }

    fn list_item(name: &str, category: Option<&str>, amount: Option<f64>, unit: Option<&str>, checked: bool) -> GroceryListItem {
        GroceryListItem {
            id: Uuid::new_v4(),
            grocery_list_id: Uuid::new_v4(),
            ingredient_id: Uuid::new_v4(),
            ingredient_name: name.into(),
            category: category.map(|c| c.to_string()),
            amount,
            unit: unit.map(|u| u.to_string()),
            is_checked: checked,
            notes: None,
        }
    }

    #[test]
    fn build_keeps_one_line_per_recipe_ingredient() {
        let meal_a = Uuid::new_v4();
        let meal_b = Uuid::new_v4();
        let list_id = Uuid::new_v4();
        let items = vec![plan_item(meal_a), plan_item(meal_b)];
        let mut by_meal = HashMap::new();
        by_meal.insert(meal_a, vec![recipe_line(meal_a, "flour", Some(2.0), Some("cups"))]);
        by_meal.insert(meal_b, vec![recipe_line(meal_b, "flour", Some(1.0), Some("cup"))]);

        let drafts = build(&items, &by_meal, list_id);

        // Two flour entries stay separate, no summation across meals.
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].amount, Some(2.0));
        assert_eq!(drafts[1].amount, Some(1.0));
        assert!(drafts.iter().all(|d| d.grocery_list_id == list_id));
    }

    #[test]
    fn build_preserves_plan_item_then_ingredient_order() {
        let meal_a = Uuid::new_v4();
        let meal_b = Uuid::new_v4();
        let items = vec![plan_item(meal_b), plan_item(meal_a)];
        let mut by_meal = HashMap::new();
        let line_b1 = recipe_line(meal_b, "rice", Some(1.0), Some("cup"));
        let line_b2 = recipe_line(meal_b, "beans", Some(1.0), Some("can"));
        let line_a = recipe_line(meal_a, "milk", Some(1.0), Some("gal"));
        by_meal.insert(meal_b, vec![line_b1.clone(), line_b2.clone()]);
        by_meal.insert(meal_a, vec![line_a.clone()]);

        let drafts = build(&items, &by_meal, Uuid::new_v4());

        let ids: Vec<Uuid> = drafts.iter().map(|d| d.ingredient_id).collect();
        assert_eq!(
            ids,
            vec![line_b1.ingredient_id, line_b2.ingredient_id, line_a.ingredient_id]
        );
    }

    #[test]
    fn build_skips_meals_without_recipe_lines() {
        let meal = Uuid::new_v4();
        let items = vec![plan_item(meal)];
        let drafts = build(&items, &HashMap::new(), Uuid::new_v4());
        assert!(drafts.is_empty());
    }

    #[test]
    fn grouping_is_a_partition_in_first_seen_order() {
        let items = vec![
            list_item("milk", Some("Dairy"), Some(1.0), Some("gal"), false),
            list_item("apples", Some("Produce"), Some(6.0), None, false),
            list_item("cheese", Some("Dairy"), Some(1.0), Some("block"), false),
            list_item("mystery", None, None, None, false),
        ];
        let total = items.len();

        let groups = group_by_category(items);

        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Dairy", "Produce", "Other"]);
        let flattened: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(flattened, total);
        assert_eq!(groups[0].items[0].ingredient_name, "milk");
        assert_eq!(groups[0].items[1].ingredient_name, "cheese");
    }

    #[test]
    fn empty_category_string_falls_back_to_other() {
        let groups = group_by_category(vec![list_item("salt", Some(""), None, None, false)]);
        assert_eq!(groups[0].category, "Other");
    }

    #[test]
    fn toggle_round_trip_restores_item() {
        let original = list_item("milk", Some("Dairy"), Some(1.0), Some("gal"), false);
        let checked = toggle(original.clone(), true);
        assert!(checked.is_checked);
        let back = toggle(checked, false);
        assert_eq!(back.is_checked, original.is_checked);
        assert_eq!(back.ingredient_name, original.ingredient_name);
        assert_eq!(back.amount, original.amount);
    }

    #[test]
    fn toggle_is_idempotent() {
        let item = list_item("milk", None, None, None, true);
        let same = toggle(item.clone(), true);
        assert_eq!(same.is_checked, item.is_checked);
    }

    #[test]
    fn export_matches_expected_layout() {
        let items = vec![list_item("Milk", Some("Dairy"), Some(1.0), Some("gal"), false)];
        let text = export_text(&items, "Week of 2/3", "8/6/2026");
        assert_eq!(text, "Week of 2/3\n\nGenerated on: 8/6/2026\n\n• Milk 1 gal");
    }

    #[test]
    fn export_skips_checked_items() {
        let items = vec![
            list_item("Milk", None, Some(1.0), Some("gal"), true),
            list_item("Bread", None, Some(2.0), Some("loaves"), false),
        ];
        let text = export_text(&items, "Shopping", "8/6/2026");
        assert!(!text.contains("Milk"));
        assert!(text.contains("• Bread 2 loaves"));
    }

    #[test]
    fn export_omits_missing_amounts() {
        let items = vec![list_item("Milk", None, None, Some("gal"), false)];
        let text = export_text(&items, "Shopping", "8/6/2026");
        assert!(text.ends_with("• Milk"));
    }

    #[test]
    fn export_handles_fractional_amounts() {
        let items = vec![list_item("Butter", None, Some(0.5), Some("lb"), false)];
        let text = export_text(&items, "Shopping", "8/6/2026");
        assert!(text.ends_with("• Butter 0.5 lb"));
    }

    #[test]
    fn filename_slugifies_title() {
        assert_eq!(export_filename("Week of 2/3"), "week_of_2_3.txt");
        assert_eq!(export_filename("Groceries"), "groceries.txt");
    }
}
