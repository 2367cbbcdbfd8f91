use serde::{Deserialize, Serialize};

use super::repo::{Meal, MealIngredientRow};

#[derive(Debug, Serialize)]
pub struct MealDetails {
    #[serde(flatten)]
    pub meal: Meal,
    pub ingredients: Vec<MealIngredientRow>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_prep_time")]
    pub prep_time: i32,
    #[serde(default = "default_cook_time")]
    pub cook_time: i32,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub cuisine_type: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,
}

fn default_prep_time() -> i32 {
    15
}
fn default_cook_time() -> i32 {
    30
}
fn default_servings() -> i32 {
    4
}
fn default_difficulty() -> String {
    "easy".into()
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_meal_fills_form_defaults() {
        let req: CreateMealRequest = serde_json::from_str(r#"{"name":"Lentil Soup"}"#).unwrap();
        assert_eq!(req.prep_time, 15);
        assert_eq!(req.cook_time, 30);
        assert_eq!(req.servings, 4);
        assert_eq!(req.difficulty_level, "easy");
        assert!(req.dietary_tags.is_empty());
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }
}
