//! Raw nutrient amounts and their resolution into the quantities the flow
//! graph is built from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

mod parse;
mod resolve;

pub use parse::{RawFood, RawFoodNutrient, amounts_from_food, parse_amounts};
pub use resolve::{ResolvedQuantities, resolve};

/// Name → grams lookup. Keys are stored lowercased so every lookup is
/// case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, f64>", into = "HashMap<String, f64>")]
pub struct NutrientAmounts {
    amounts: HashMap<String, f64>,
}

impl NutrientAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an amount. A name that already holds a strictly positive
    /// amount keeps it; a zero or missing entry is replaced.
    pub fn insert(&mut self, name: &str, amount: f64) {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return;
        }

        match self.amounts.get(&key) {
            Some(existing) if *existing > 0.0 => {}
            _ => {
                self.amounts.insert(key, amount);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.amounts.get(&name.to_lowercase()).copied()
    }

    /// The amount for `name` only if it is present, finite and strictly
    /// positive. Zero is indistinguishable from "not measured".
    pub fn positive(&self, name: &str) -> Option<f64> {
        self.get(name)
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
    }
}

impl From<HashMap<String, f64>> for NutrientAmounts {
    fn from(raw: HashMap<String, f64>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<NutrientAmounts> for HashMap<String, f64> {
    fn from(amounts: NutrientAmounts) -> Self {
        amounts.amounts
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for NutrientAmounts {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (name, amount) in iter {
            amounts.insert(name.as_ref(), amount);
        }
        amounts
    }
}
