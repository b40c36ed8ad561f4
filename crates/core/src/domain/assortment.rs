use serde::{Deserialize, Serialize};

/// Number of ranked products surfaced to the operator.
pub const DEFAULT_TOP_K: usize = 20;

/// A product name with its rounded score. Serialized as a `[name, score]` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct ScoredProduct {
    pub name: String,
    pub score: f64,
}

impl ScoredProduct {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self { name: name.into(), score }
    }
}

impl From<(String, f64)> for ScoredProduct {
    fn from((name, score): (String, f64)) -> Self {
        Self { name, score }
    }
}

impl From<ScoredProduct> for (String, f64) {
    fn from(value: ScoredProduct) -> Self {
        (value.name, value.score)
    }
}

/// Products ordered by score descending, ties in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<ScoredProduct>,
}

impl RankedList {
    /// Callers are responsible for supplying entries already in rank order.
    pub(crate) fn from_ordered(entries: Vec<ScoredProduct>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoredProduct] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `k` entries, in rank order.
    pub fn top(&self, k: usize) -> Vec<ScoredProduct> {
        self.entries.iter().take(k).cloned().collect()
    }
}

/// The artifact the operator views and edits through feedback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssortmentOutput {
    pub products: Vec<ScoredProduct>,
    pub rationale: String,
}
