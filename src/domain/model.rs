use serde::{Deserialize, Deserializer, Serialize};

/// One food/calorie entry. Values are opaque text; nothing is parsed as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRow {
    pub food_item: String,
    pub vegetable_calorie: String,
    pub meat_calorie: String,
    pub total_calorie: String,
}

impl FoodRow {
    pub fn new(
        food_item: impl Into<String>,
        vegetable_calorie: impl Into<String>,
        meat_calorie: impl Into<String>,
        total_calorie: impl Into<String>,
    ) -> Self {
        Self {
            food_item: food_item.into(),
            vegetable_calorie: vegetable_calorie.into(),
            meat_calorie: meat_calorie.into(),
            total_calorie: total_calorie.into(),
        }
    }

    /// 欄位順序: food item, vegetable, meat, total
    pub fn cells(&self) -> [&str; 4] {
        [
            &self.food_item,
            &self.vegetable_calorie,
            &self.meat_calorie,
            &self.total_calorie,
        ]
    }
}

impl From<[String; 4]> for FoodRow {
    fn from([food_item, vegetable_calorie, meat_calorie, total_calorie]: [String; 4]) -> Self {
        Self {
            food_item,
            vegetable_calorie,
            meat_calorie,
            total_calorie,
        }
    }
}

/// Body returned by the analysis service. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub food_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vegetable_calorie: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub meat_calorie: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub total_calorie: String,
}

impl From<AnalysisResponse> for FoodRow {
    fn from(response: AnalysisResponse) -> Self {
        Self {
            food_item: response.food_name,
            vegetable_calorie: response.vegetable_calorie,
            meat_calorie: response.meat_calorie,
            total_calorie: response.total_calorie,
        }
    }
}

// 數字或布林值轉成文字，null 視為空字串
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}
