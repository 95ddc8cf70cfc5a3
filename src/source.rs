use crate::nutrients::NutrientAmounts;

/// Failure fetching raw nutrient data from a provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("food {0} not found")]
    NotFound(u64),
    #[error("nutrient data unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Whether asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Anything that can hand out raw per-100g nutrient amounts for a food id.
/// Fetches run on a background thread, so implementations must be shareable.
pub trait NutrientSource: Send + Sync + 'static {
    fn fetch_amounts(&self, food_id: u64) -> Result<NutrientAmounts, FetchError>;
}
