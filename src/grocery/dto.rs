use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator::CategoryGroup;
use super::repo::GroceryList;

#[derive(Debug, Deserialize)]
pub struct GenerateListRequest {
    pub meal_plan_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub ingredient_id: Uuid,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub is_checked: bool,
}

#[derive(Debug, Serialize)]
pub struct GroceryListDetails {
    #[serde(flatten)]
    pub list: GroceryList,
    pub remaining: usize,
    pub completed: usize,
    pub groups: Vec<CategoryGroup>,
}
