use serde::{Deserialize, Serialize};

use crate::util::non_negative;

use super::NutrientAmounts;

const WATER: &[&str] = &["Water"];
const PROTEIN: &[&str] = &["Protein"];
const TOTAL_FAT: &[&str] = &["Total lipid (fat)", "Total fat"];
const CARBS: &[&str] = &["Carbohydrate, by difference", "Carbohydrates"];
const ASH: &[&str] = &["Ash"];
const SODIUM_MG: &[&str] = &["Sodium, Na"];
const SAT_FAT: &[&str] = &["Fatty acids, total saturated"];
const MONO_FAT: &[&str] = &["Fatty acids, total monounsaturated"];
const POLY_FAT: &[&str] = &["Fatty acids, total polyunsaturated"];
const TRANS_FAT: &[&str] = &["Fatty acids, total trans", "Trans fat", "Trans fatty acids"];
const TOTAL_SUGARS: &[&str] = &[
    "Total Sugars",
    "Sugars, total",
    "Sugars, total including NLEA",
];
const FIBER: &[&str] = &["Fiber, total dietary"];
const STARCH: &[&str] = &["Starch"];

const INDIVIDUAL_SUGARS: &[&str] = &[
    "Glucose", "Fructose", "Sucrose", "Maltose", "Lactose", "Galactose",
];

const AMINO_ACIDS: &[&str] = &[
    "Tryptophan",
    "Threonine",
    "Isoleucine",
    "Leucine",
    "Lysine",
    "Methionine",
    "Cystine",
    "Phenylalanine",
    "Tyrosine",
    "Valine",
    "Arginine",
    "Histidine",
    "Alanine",
    "Aspartic acid",
    "Glutamic acid",
    "Glycine",
    "Proline",
    "Serine",
    "Hydroxyproline",
];

/// Gram amounts per 100 g for every quantity the flow graph uses. All fields
/// are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuantities {
    pub water: f64,
    pub protein: f64,
    pub total_fat: f64,
    pub carbs: f64,
    pub minerals: f64,
    pub sodium: f64,
    pub amino_acids: f64,
    pub sat_fat: f64,
    pub mono_fat: f64,
    pub poly_fat: f64,
    pub trans_fat: f64,
    pub other_fats: f64,
    pub sugars: f64,
    pub fiber: f64,
    pub starch: f64,
}

impl ResolvedQuantities {
    pub fn top_level_sum(&self) -> f64 {
        self.water + self.protein + self.total_fat + self.carbs + self.minerals
    }

    pub fn fatty_acids(&self) -> f64 {
        self.sat_fat + self.mono_fat + self.poly_fat + self.trans_fat
    }
}

fn first_positive(amounts: &NutrientAmounts, aliases: &[&str]) -> f64 {
    aliases
        .iter()
        .find_map(|name| amounts.positive(name))
        .unwrap_or(0.0)
}

fn sum_positive(amounts: &NutrientAmounts, names: &[&str]) -> f64 {
    names
        .iter()
        .filter_map(|name| amounts.positive(name))
        .sum()
}

pub fn resolve(amounts: &NutrientAmounts) -> ResolvedQuantities {
    let water = first_positive(amounts, WATER);
    let protein = first_positive(amounts, PROTEIN);
    let total_fat = first_positive(amounts, TOTAL_FAT);
    let carbs = first_positive(amounts, CARBS);

    let sat_fat = first_positive(amounts, SAT_FAT);
    let mono_fat = first_positive(amounts, MONO_FAT);
    let poly_fat = first_positive(amounts, POLY_FAT);
    let trans_fat = first_positive(amounts, TRANS_FAT);
    let other_fats = non_negative(total_fat - sat_fat - mono_fat - poly_fat - trans_fat);

    let mut sugars = first_positive(amounts, TOTAL_SUGARS);
    if sugars == 0.0 {
        sugars = sum_positive(amounts, INDIVIDUAL_SUGARS);
    }

    let fiber = first_positive(amounts, FIBER);
    let mut starch = first_positive(amounts, STARCH);
    if starch == 0.0 {
        starch = non_negative(carbs - sugars - fiber);
    }

    let mut minerals = first_positive(amounts, ASH);
    if minerals == 0.0 {
        minerals = non_negative(100.0 - water - protein - total_fat - carbs);
    }

    let sodium = first_positive(amounts, SODIUM_MG) / 1000.0;

    let mut amino_acids = sum_positive(amounts, AMINO_ACIDS);
    if amino_acids == 0.0 {
        amino_acids = protein;
    }
    let amino_acids = amino_acids.min(protein);

    let resolved = ResolvedQuantities {
        water,
        protein,
        total_fat,
        carbs,
        minerals,
        sodium,
        amino_acids,
        sat_fat,
        mono_fat,
        poly_fat,
        trans_fat,
        other_fats,
        sugars,
        fiber,
        starch,
    };
    log::debug!("resolved nutrient quantities: {resolved:?}");
    resolved
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn amounts(entries: &[(&str, f64)]) -> NutrientAmounts {
        entries.iter().map(|(name, amount)| (*name, *amount)).collect()
    }

    #[test]
    fn aliases_fall_through_zero_entries() {
        let resolved = resolve(&amounts(&[
            ("Fatty acids, total trans", 0.0),
            ("Trans fat", 0.4),
            ("Trans fatty acids", 0.9),
        ]));
        assert_eq!(resolved.trans_fat, 0.4);
    }

    #[test]
    fn sugars_fall_back_to_individual_sugars() {
        let resolved = resolve(&amounts(&[
            ("Total Sugars", 0.0),
            ("Glucose", 2.0),
            ("Fructose", 3.0),
        ]));
        assert_eq!(resolved.sugars, 5.0);
    }

    #[test]
    fn direct_sugars_win_over_individual_sum() {
        let resolved = resolve(&amounts(&[("Sugars, total", 7.5), ("Glucose", 2.0)]));
        assert_eq!(resolved.sugars, 7.5);
    }

    #[test]
    fn starch_is_carbs_remainder() {
        let resolved = resolve(&amounts(&[
            ("Carbohydrate, by difference", 20.0),
            ("Total Sugars", 5.0),
            ("Fiber, total dietary", 3.0),
        ]));
        assert_eq!(resolved.starch, 12.0);
    }

    #[test]
    fn starch_remainder_clamps_to_zero() {
        let resolved = resolve(&amounts(&[
            ("Carbohydrate, by difference", 4.0),
            ("Total Sugars", 5.0),
        ]));
        assert_eq!(resolved.starch, 0.0);
    }

    #[test]
    fn other_fats_is_unassigned_remainder() {
        let resolved = resolve(&amounts(&[
            ("Total lipid (fat)", 5.0),
            ("Fatty acids, total saturated", 2.0),
            ("Fatty acids, total monounsaturated", 1.5),
            ("Fatty acids, total polyunsaturated", 1.0),
            ("Fatty acids, total trans", 0.2),
        ]));
        assert!(approx_eq!(f64, resolved.other_fats, 0.3, epsilon = 1e-9));
    }

    #[test]
    fn other_fats_never_negative() {
        let resolved = resolve(&amounts(&[
            ("Total lipid (fat)", 1.0),
            ("Fatty acids, total saturated", 2.0),
        ]));
        assert_eq!(resolved.other_fats, 0.0);
    }

    #[test]
    fn minerals_prefer_ash() {
        let resolved = resolve(&amounts(&[("Ash", 1.2), ("Water", 50.0)]));
        assert_eq!(resolved.minerals, 1.2);
    }

    #[test]
    fn minerals_fall_back_to_remainder_of_100g() {
        let resolved = resolve(&amounts(&[
            ("Water", 70.0),
            ("Protein", 20.0),
            ("Total lipid (fat)", 5.0),
            ("Carbohydrate, by difference", 3.0),
        ]));
        assert!(approx_eq!(f64, resolved.minerals, 2.0, epsilon = 1e-9));
    }

    #[test]
    fn empty_amounts_leave_only_minerals() {
        let resolved = resolve(&NutrientAmounts::new());
        assert_eq!(
            resolved,
            ResolvedQuantities {
                minerals: 100.0,
                ..ResolvedQuantities::default()
            }
        );
    }

    #[test]
    fn minerals_remainder_ignores_unrelated_entries() {
        let resolved = resolve(&amounts(&[("Sodium, Na", 400.0), ("Fiber, total dietary", 3.0)]));
        assert_eq!(resolved.minerals, 100.0);
    }

    #[test]
    fn sodium_converts_milligrams() {
        let resolved = resolve(&amounts(&[("Sodium, Na", 450.0)]));
        assert!(approx_eq!(f64, resolved.sodium, 0.45, epsilon = 1e-12));
    }

    #[test]
    fn amino_acids_sum_and_cap_at_protein() {
        let resolved = resolve(&amounts(&[
            ("Protein", 3.0),
            ("Leucine", 1.5),
            ("Lysine", 1.0),
        ]));
        assert_eq!(resolved.amino_acids, 2.5);

        let capped = resolve(&amounts(&[("Protein", 1.0), ("Glutamic acid", 4.0)]));
        assert_eq!(capped.amino_acids, 1.0);

        let fallback = resolve(&amounts(&[("Protein", 8.0)]));
        assert_eq!(fallback.amino_acids, 8.0);
    }
}
