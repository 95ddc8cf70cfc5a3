use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::NutrientAmounts;

/// One food as exported by FoodData Central, either the full `/food/{id}`
/// shape or the abridged search shape.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFood {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub brand_owner: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<RawFoodNutrient>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFoodNutrient {
    #[serde(default)]
    nutrient: Option<RawNutrient>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    nutrient_name: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNutrient {
    #[serde(default)]
    name: Option<String>,
}

impl RawFoodNutrient {
    fn name_and_amount(&self) -> Option<(&str, f64)> {
        let full = self
            .nutrient
            .as_ref()
            .and_then(|nutrient| nutrient.name.as_deref())
            .zip(self.amount);
        let abridged = self.nutrient_name.as_deref().zip(self.value);
        full.or(abridged)
    }
}

pub fn amounts_from_food(food: &RawFood) -> NutrientAmounts {
    food.food_nutrients
        .iter()
        .filter_map(RawFoodNutrient::name_and_amount)
        .collect()
}

/// Parses raw amounts from either a food object (anything with a
/// `foodNutrients` array) or a flat `{ name: grams }` object.
pub fn parse_amounts(raw: &str) -> Result<NutrientAmounts> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON for nutrient amounts")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("nutrient amounts must be a JSON object"))?;

    if object.contains_key("foodNutrients") {
        let food = RawFood::deserialize(&parsed).context("invalid food object")?;
        return Ok(amounts_from_food(&food));
    }

    let mut amounts = NutrientAmounts::new();
    for (name, value) in object {
        let Some(amount) = value.as_f64() else {
            log::debug!("skipping non-numeric amount for {name:?}");
            continue;
        };
        amounts.insert(name, amount);
    }

    if amounts.is_empty() {
        Err(anyhow!("no numeric nutrient amounts found"))
    } else {
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_food_shape() {
        let raw = r#"{
            "fdcId": 171077,
            "description": "Chicken, broilers or fryers, breast, meat only, raw",
            "dataType": "SR Legacy",
            "foodNutrients": [
                {"nutrient": {"name": "Water"}, "amount": 74.76},
                {"nutrient": {"name": "Protein"}, "amount": 22.5},
                {"nutrient": {"name": "Total lipid (fat)"}, "amount": 2.62},
                {"nutrient": {"name": "Energy"}}
            ]
        }"#;

        let amounts = parse_amounts(raw).unwrap();
        assert_eq!(amounts.positive("water"), Some(74.76));
        assert_eq!(amounts.positive("protein"), Some(22.5));
        assert_eq!(amounts.get("energy"), None);
    }

    #[test]
    fn reads_abridged_food_shape() {
        let food: RawFood = serde_json::from_str(
            r#"{
                "fdcId": 1,
                "foodNutrients": [
                    {"nutrientName": "Carbohydrate, by difference", "value": 14.0},
                    {"nutrientName": "Fiber, total dietary", "value": 2.4}
                ]
            }"#,
        )
        .unwrap();

        let amounts = amounts_from_food(&food);
        assert_eq!(amounts.positive("carbohydrate, by difference"), Some(14.0));
        assert_eq!(amounts.positive("fiber, total dietary"), Some(2.4));
    }

    #[test]
    fn reads_flat_map_and_skips_non_numbers() {
        let amounts = parse_amounts(r#"{"Water": 88, "note": "fresh"}"#).unwrap();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts.positive("water"), Some(88.0));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(parse_amounts("[1, 2]").is_err());
        assert!(parse_amounts(r#"{"only": "text"}"#).is_err());
    }
}
