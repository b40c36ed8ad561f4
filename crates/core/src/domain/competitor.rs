use serde::{Deserialize, Serialize};

/// Price benchmarks across every competitor listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSummary {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub products: Vec<String>,
    pub sources: Vec<String>,
}

impl CompetitorSummary {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
