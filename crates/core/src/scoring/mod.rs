//! Deterministic product scoring
//!
//! Combines theme alignment, capped sales volume and two sentiment multipliers
//! into one rounded score per vendor product, then ranks the catalog.

mod scorer;
mod themes;

pub use scorer::{round_score, Scorer, ScoringInput, ScoringWeights};
pub use themes::decode_themes;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    base: 1.0,
    theme_match_bonus: 0.5,
    units_per_point: 100.0,
    sales_bonus_cap: 2.0,
    neutral_sentiment: 0.5,
};
