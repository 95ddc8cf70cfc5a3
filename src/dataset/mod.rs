//! A local FoodData Central export acting as the data provider.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::flow::{FlowGraph, FlowOptions, build};
use crate::nutrients::{NutrientAmounts, RawFood, amounts_from_food, resolve};
use crate::source::{FetchError, NutrientSource};

mod search;

pub use search::{PAGE_SIZE, SearchPage, SearchResult};

#[derive(Clone, Debug)]
pub struct FoodRecord {
    pub id: u64,
    pub description: String,
    pub data_type: Option<String>,
    pub brand_owner: Option<String>,
    pub amounts: NutrientAmounts,
}

impl From<RawFood> for FoodRecord {
    fn from(food: RawFood) -> Self {
        let amounts = amounts_from_food(&food);
        Self {
            id: food.fdc_id,
            description: food.description,
            data_type: food.data_type,
            brand_owner: food.brand_owner,
            amounts,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FoodDataset {
    foods: Vec<FoodRecord>,
    index_by_id: HashMap<u64, usize>,
}

impl FoodDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse dataset {}", path.display()))
    }

    /// Accepts a bare array of foods, or an object wrapping one (the
    /// FoodData Central downloads use keys like `FoundationFoods`).
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(raw).context("invalid JSON in dataset")?;

        let entries = match &parsed {
            Value::Array(entries) => entries,
            Value::Object(object) => object
                .values()
                .find_map(Value::as_array)
                .ok_or_else(|| anyhow!("dataset object holds no array of foods"))?,
            _ => return Err(anyhow!("unexpected JSON type for dataset")),
        };

        let mut dataset = Self::default();
        for entry in entries {
            match RawFood::deserialize(entry) {
                Ok(food) => dataset.insert(food.into()),
                Err(error) => log::debug!("skipping malformed food entry: {error}"),
            }
        }

        if dataset.is_empty() {
            return Err(anyhow!("dataset contains no usable foods"));
        }

        log::debug!("loaded {} foods", dataset.len());
        Ok(dataset)
    }

    pub fn insert(&mut self, food: FoodRecord) {
        if let Some(&index) = self.index_by_id.get(&food.id) {
            self.foods[index] = food;
        } else {
            self.index_by_id.insert(food.id, self.foods.len());
            self.foods.push(food);
        }
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn food(&self, id: u64) -> Option<&FoodRecord> {
        self.index_by_id.get(&id).map(|&index| &self.foods[index])
    }

    pub fn raw_amounts(&self, id: u64) -> Result<&NutrientAmounts, FetchError> {
        self.food(id)
            .map(|food| &food.amounts)
            .ok_or(FetchError::NotFound(id))
    }

    /// Server-side equivalent of resolve + build for one food.
    pub fn get_food_nutrients(&self, id: u64, options: FlowOptions) -> Result<FlowGraph, FetchError> {
        let amounts = self.raw_amounts(id)?;
        Ok(build(&resolve(amounts), options))
    }
}

impl NutrientSource for FoodDataset {
    fn fetch_amounts(&self, food_id: u64) -> Result<NutrientAmounts, FetchError> {
        self.raw_amounts(food_id).cloned()
    }
}
