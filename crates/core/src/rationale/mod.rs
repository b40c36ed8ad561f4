//! Operator-facing rationale for a ranked assortment
//!
//! Truncates the ranked list to the top `k` products and renders a short
//! explanation from the store profile and the two sentiment summaries.

use tracing::debug;

use crate::domain::assortment::{AssortmentOutput, RankedList, DEFAULT_TOP_K};
use crate::domain::profile::StoreProfile;
use crate::domain::sentiment::SentimentSummary;
use crate::scoring::round_score;

/// Shown in place of the store id when the profile carries none.
pub const UNKNOWN_STORE_LABEL: &str = "the college";
/// Shown in place of the theme list when the profile has no themes.
pub const NO_THEMES_LABEL: &str = "N/A";

const RATIONALE_TEMPLATE: &str = "Recommendations for **{{store}}** are based on:\n\
- Alignment with campus themes: {{themes}}\n\
- Recent sales performance trends\n\
- Positive student feedback and social media sentiment (avg score: {{sentiment}})\n\
\n\
Products scoring highest across these factors are prioritized below.";

#[derive(Debug, Clone)]
pub struct RationaleGenerator {
    top_k: usize,
}

impl Default for RationaleGenerator {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

impl RationaleGenerator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// The output's products are always `ranked.top(k)`: same order, same scores.
    pub fn generate(
        &self,
        ranked: &RankedList,
        profile: &StoreProfile,
        survey: &SentimentSummary,
        trend: &SentimentSummary,
    ) -> AssortmentOutput {
        let products = ranked.top(self.top_k);
        let sentiment = mean_sentiment(survey, trend);
        let rationale = render_rationale(profile, sentiment);

        debug!(
            event_name = "rationale.generated",
            store_id = %profile.store_id,
            product_count = products.len(),
            ranked_count = ranked.len(),
            mean_sentiment = sentiment,
            "assortment rationale generated"
        );

        AssortmentOutput { products, rationale }
    }
}

/// Mean of the two summaries' sentiment, rounded to two decimals. A summary
/// with no sentiment contributes `0.0` here, unlike the scorer's neutral
/// default.
pub fn mean_sentiment(survey: &SentimentSummary, trend: &SentimentSummary) -> f64 {
    round_score((survey.sentiment_or(0.0) + trend.sentiment_or(0.0)) / 2.0)
}

pub fn render_rationale(profile: &StoreProfile, sentiment: f64) -> String {
    let store = if profile.store_id.trim().is_empty() {
        UNKNOWN_STORE_LABEL.to_string()
    } else {
        profile.store_id.clone()
    };
    let themes = if profile.themes.is_empty() {
        NO_THEMES_LABEL.to_string()
    } else {
        profile.themes.join(", ")
    };
    let sentiment = format!("{sentiment:.2}");

    substitute_variables(
        RATIONALE_TEMPLATE,
        &[("store", store.as_str()), ("themes", themes.as_str()), ("sentiment", sentiment.as_str())],
    )
}

/// Single pass over the template so substituted values are never re-expanded.
fn substitute_variables(template: &str, variables: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            output.push_str(&rest[start..]);
            return output;
        };
        let key = &after_open[..end];
        match variables.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    output.push_str(rest);
    output
}
