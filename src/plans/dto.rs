use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{MealPlan, MealPlanItem, PlanItemWithMeal};

/// Slot a meal occupies within a day, stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// Manual add-to-plan: schedule one meal into a specific slot.
#[derive(Debug, Deserialize)]
pub struct ScheduleMealRequest {
    pub meal_id: Uuid,
    pub day_of_week: i16,
    pub meal_type: MealType,
    #[serde(default = "default_servings")]
    pub servings: i32,
    pub notes: Option<String>,
}

fn default_servings() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct GeneratedPlanResponse {
    pub plan: MealPlan,
    pub items: Vec<MealPlanItem>,
}

#[derive(Debug, Serialize)]
pub struct PlanItemsResponse {
    pub plan: MealPlan,
    pub items: Vec<PlanItemWithMeal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_round_trips_lowercase() {
        let json = serde_json::to_string(&MealType::Dinner).unwrap();
        assert_eq!(json, "\"dinner\"");
        let back: MealType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MealType::Dinner);
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        assert!(serde_json::from_str::<MealType>("\"brunch\"").is_err());
    }
}
