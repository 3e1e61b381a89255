use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: i64,
}

/// One validated story turn. Field names follow the JSON the model is asked
/// to produce, which is also what `/generate` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub story: String,
    #[serde(rename = "firstoption")]
    pub first_option: String,
    #[serde(rename = "secondoption")]
    pub second_option: String,
    pub name: String,
    pub hp: i64,
    pub location: String,
    pub inventory: Vec<Item>,
}

impl GenerationResult {
    pub fn options(&self) -> Vec<String> {
        vec![self.first_option.clone(), self.second_option.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub hp: i64,
    pub location: String,
    pub inventory: Vec<Item>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            name: "Adventurer".to_string(),
            hp: 100,
            location: "Crossroads".to_string(),
            inventory: Vec::new(),
        }
    }
}

impl PlayerState {
    pub fn inventory_line(&self) -> String {
        self.inventory
            .iter()
            .map(|item| format!("{} x{}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<&GenerationResult> for PlayerState {
    fn from(result: &GenerationResult) -> Self {
        Self {
            name: result.name.clone(),
            hp: result.hp,
            location: result.location.clone(),
            inventory: result.inventory.clone(),
        }
    }
}
