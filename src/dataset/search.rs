use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use super::{FoodDataset, FoodRecord};

pub const PAGE_SIZE: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "fdcId")]
    pub id: u64,
    pub description: String,
    pub data_type: Option<String>,
    pub brand_owner: Option<String>,
}

impl From<&FoodRecord> for SearchResult {
    fn from(food: &FoodRecord) -> Self {
        Self {
            id: food.id,
            description: food.description.clone(),
            data_type: food.data_type.clone(),
            brand_owner: food.brand_owner.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub page: usize,
    pub total_pages: usize,
    pub total_hits: usize,
    pub has_more: bool,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn food_score(matcher: &SkimMatcherV2, food: &FoodRecord, query: &str) -> Option<i64> {
    let description = fuzzy_match_score(matcher, &food.description, query);
    let brand = food
        .brand_owner
        .as_deref()
        .and_then(|brand| fuzzy_match_score(matcher, brand, query));
    description.max(brand)
}

impl FoodDataset {
    /// Fuzzy search over descriptions and brand owners, best match first.
    /// `page` is 1-based; `data_types` filters when non-empty.
    pub fn search(&self, query: &str, page: usize, data_types: &[String]) -> SearchPage {
        let page = page.max(1);
        let query = query.trim();
        if query.is_empty() {
            return SearchPage {
                page,
                ..SearchPage::default()
            };
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .foods
            .iter()
            .filter(|food| {
                data_types.is_empty()
                    || food
                        .data_type
                        .as_ref()
                        .is_some_and(|data_type| data_types.contains(data_type))
            })
            .filter_map(|food| food_score(&matcher, food, query).map(|score| (score, food)))
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.description.cmp(&b.1.description))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        let total_hits = ranked.len();
        let total_pages = total_hits.div_ceil(PAGE_SIZE);
        let results = ranked
            .into_iter()
            .skip((page - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .map(|(_score, food)| SearchResult::from(food))
            .collect();

        SearchPage {
            results,
            page,
            total_pages,
            total_hits,
            has_more: page < total_pages,
        }
    }
}
