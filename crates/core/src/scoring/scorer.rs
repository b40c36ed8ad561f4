//! Score calculation and ranking for vendor products

use std::collections::HashSet;

use tracing::{debug, warn};

use super::themes::decode_themes;
use crate::domain::assortment::{RankedList, ScoredProduct};
use crate::domain::product::{Product, VendorCatalog};
use crate::domain::sales::SalesAggregate;
use crate::domain::sentiment::SentimentSummary;
use crate::errors::DataContractError;

/// Constants of the scoring formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Starting score for every product (default: 1.0)
    pub base: f64,
    /// Added per product theme that is also a store theme (default: 0.5)
    pub theme_match_bonus: f64,
    /// Units sold that add one point (default: 100.0)
    pub units_per_point: f64,
    /// Ceiling on the sales contribution (default: 2.0)
    pub sales_bonus_cap: f64,
    /// Sentiment assumed when a summary has none (default: 0.5)
    pub neutral_sentiment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Everything the scorer reads. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub catalog: &'a VendorCatalog,
    pub sales: &'a SalesAggregate,
    pub survey: &'a SentimentSummary,
    pub trend: &'a SentimentSummary,
    pub store_themes: &'a [String],
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    /// Scores every catalog product and orders them by score descending.
    /// Equal scores keep catalog order.
    pub fn rank(&self, input: ScoringInput<'_>) -> Result<RankedList, DataContractError> {
        validate_catalog(input.catalog)?;

        let trend_sentiment = self.sentiment(input.trend, "trend");
        let survey_sentiment = self.sentiment(input.survey, "survey");
        let trend_multiplier = sentiment_multiplier(trend_sentiment);
        let survey_multiplier = sentiment_multiplier(survey_sentiment);
        let store_themes: HashSet<&str> = input.store_themes.iter().map(String::as_str).collect();

        debug!(
            event_name = "scoring.inputs",
            trend_sentiment,
            survey_sentiment,
            store_theme_count = store_themes.len(),
            product_count = input.catalog.len(),
            "scoring vendor catalog"
        );

        let mut scored: Vec<ScoredProduct> = input
            .catalog
            .products()
            .iter()
            .map(|product| {
                let base = self.base_score(product, input.sales, &store_themes);
                let score = round_score(base * trend_multiplier * survey_multiplier);
                ScoredProduct::new(product.name.clone(), score)
            })
            .collect();

        // `sort_by` is stable, which is what keeps ties in catalog order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            event_name = "scoring.ranked",
            ranked_count = scored.len(),
            top_product = scored.first().map(|entry| entry.name.as_str()).unwrap_or("<none>"),
            "vendor catalog ranked"
        );

        Ok(RankedList::from_ordered(scored))
    }

    /// Score before sentiment multipliers: base, theme matches and capped sales.
    pub fn base_score(
        &self,
        product: &Product,
        sales: &SalesAggregate,
        store_themes: &HashSet<&str>,
    ) -> f64 {
        let theme_matches = decode_themes(&product.themes)
            .iter()
            .filter(|theme| store_themes.contains(theme.as_str()))
            .count();

        let units_sold = sales.units_sold(&product.name) as f64;
        let sales_bonus = (units_sold / self.weights.units_per_point).min(self.weights.sales_bonus_cap);

        self.weights.base + theme_matches as f64 * self.weights.theme_match_bonus + sales_bonus
    }

    fn sentiment(&self, summary: &SentimentSummary, source: &'static str) -> f64 {
        if summary.is_out_of_range() {
            warn!(
                event_name = "scoring.sentiment_out_of_range",
                source,
                average_sentiment = summary.average_sentiment,
                "sentiment outside [-1, 1] used as supplied"
            );
        }
        summary.sentiment_or(self.weights.neutral_sentiment)
    }
}

/// Maps sentiment in `[-1, 1]` onto a multiplier in `[0, 1]`.
fn sentiment_multiplier(sentiment: f64) -> f64 {
    0.5 + 0.5 * sentiment
}

/// Rounds to two decimals, halves away from zero. Adding `0.0` folds `-0.0`
/// into `0.0` so the two compare as a tie.
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

fn validate_catalog(catalog: &VendorCatalog) -> Result<(), DataContractError> {
    let mut seen = HashSet::with_capacity(catalog.len());
    for (index, product) in catalog.products().iter().enumerate() {
        if product.name.trim().is_empty() {
            return Err(DataContractError::MissingProductName { index });
        }
        if !seen.insert(product.name.as_str()) {
            return Err(DataContractError::DuplicateProduct { name: product.name.clone() });
        }
    }
    Ok(())
}
