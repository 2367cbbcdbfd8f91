use uuid::Uuid;

use crate::meals::repo::Meal;
use crate::profiles::repo::Profile;

/// One slot per weekday, Sunday first.
pub const DAYS_PER_WEEK: usize = 7;

/// A plan item not yet persisted, ready for bulk insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItemDraft {
    pub meal_plan_id: Uuid,
    pub meal_id: Uuid,
    pub day_of_week: i16,
    pub meal_type: String,
    pub servings: i32,
}

/// Picks up to seven meals matching the profile's dietary preferences and
/// assigns them one per day, dinner slot, in catalog order. An empty
/// preference set accepts every candidate; fewer than seven qualifying meals
/// plan only that many days.
pub fn generate(profile: &Profile, candidates: &[Meal], target_plan_id: Uuid) -> Vec<PlanItemDraft> {
    candidates
        .iter()
        .filter(|meal| matches_preferences(&profile.dietary_preferences, &meal.dietary_tags))
        .take(DAYS_PER_WEEK)
        .enumerate()
        .map(|(day, meal)| PlanItemDraft {
            meal_plan_id: target_plan_id,
            meal_id: meal.id,
            day_of_week: day as i16,
            meal_type: "dinner".to_string(),
            servings: clamp_servings(meal.servings, profile.household_size),
        })
        .collect()
}

/// Set overlap, not subset: any shared tag qualifies.
fn matches_preferences(preferences: &[String], tags: &[String]) -> bool {
    if preferences.is_empty() {
        return true;
    }
    tags.iter().any(|tag| preferences.contains(tag))
}

/// A meal is scaled down to the household, never below one serving.
fn clamp_servings(meal_servings: i32, household_size: i32) -> i32 {
    meal_servings.min(household_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn profile(preferences: &[&str], household_size: i32) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: None,
            email: None,
            dietary_preferences: preferences.iter().map(|s| s.to_string()).collect(),
            allergies: vec![],
            cooking_skill_level: "beginner".into(),
            household_size,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn meal(name: &str, tags: &[&str], servings: i32) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            user_id: None,
            name: name.into(),
            description: None,
            image_url: None,
            prep_time: 10,
            cook_time: 20,
            servings,
            dietary_tags: tags.iter().map(|s| s.to_string()).collect(),
            cuisine_type: None,
            difficulty_level: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn picks_only_meals_sharing_a_tag() {
        let profile = profile(&["vegetarian"], 4);
        let plan_id = Uuid::new_v4();
        let meal_a = meal("A", &["vegetarian"], 4);
        let meal_b = meal("B", &["keto"], 4);
        let meal_c = meal("C", &["vegetarian", "gluten-free"], 4);
        let catalog = vec![meal_a.clone(), meal_b, meal_c.clone()];

        let items = generate(&profile, &catalog, plan_id);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].meal_id, meal_a.id);
        assert_eq!(items[0].day_of_week, 0);
        assert_eq!(items[1].meal_id, meal_c.id);
        assert_eq!(items[1].day_of_week, 1);
        assert!(items.iter().all(|i| i.meal_type == "dinner"));
        assert!(items.iter().all(|i| i.meal_plan_id == plan_id));
    }

    #[test]
    fn empty_preferences_accept_everything() {
        let profile = profile(&[], 4);
        let catalog: Vec<Meal> = (0..3).map(|i| meal(&format!("m{i}"), &["keto"], 4)).collect();

        let items = generate(&profile, &catalog, Uuid::new_v4());
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn caps_at_seven_days_with_sequential_days() {
        let profile = profile(&[], 4);
        let catalog: Vec<Meal> = (0..10).map(|i| meal(&format!("m{i}"), &[], 4)).collect();

        let items = generate(&profile, &catalog, Uuid::new_v4());

        assert_eq!(items.len(), 7);
        let days: Vec<i16> = items.iter().map(|i| i.day_of_week).collect();
        assert_eq!(days, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn servings_clamp_to_household_and_meal() {
        let profile = profile(&[], 2);
        let catalog = vec![meal("big", &[], 8), meal("small", &[], 1)];

        let items = generate(&profile, &catalog, Uuid::new_v4());

        assert_eq!(items[0].servings, 2); // 8 scaled down to household of 2
        assert_eq!(items[1].servings, 1); // never below one
    }

    #[test]
    fn servings_never_drop_below_one() {
        // A meal row claiming zero servings still plans one portion.
        let profile = profile(&[], 0);
        let catalog = vec![meal("odd", &[], 0)];

        let items = generate(&profile, &catalog, Uuid::new_v4());
        assert_eq!(items[0].servings, 1);
    }

    #[test]
    fn no_qualifying_meals_returns_empty() {
        let profile = profile(&["vegan"], 4);
        let catalog = vec![meal("steak", &["high-protein"], 4)];

        let items = generate(&profile, &catalog, Uuid::new_v4());
        assert!(items.is_empty());
    }

    #[test]
    fn matched_meals_always_share_a_preference_tag() {
        let profile = profile(&["vegan", "keto"], 4);
        let catalog = vec![
            meal("a", &["vegan"], 4),
            meal("b", &["mediterranean"], 4),
            meal("c", &["keto", "low-carb"], 4),
            meal("d", &[], 4),
        ];
        let by_id: std::collections::HashMap<Uuid, Vec<String>> = catalog
            .iter()
            .map(|m| (m.id, m.dietary_tags.clone()))
            .collect();

        let items = generate(&profile, &catalog, Uuid::new_v4());

        assert_eq!(items.len(), 2);
        for item in &items {
            let tags = &by_id[&item.meal_id];
            assert!(tags.iter().any(|t| profile.dietary_preferences.contains(t)));
        }
    }
}
