use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Units sold per product name. A product without an entry sold nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesAggregate {
    units_by_product: BTreeMap<String, u64>,
}

impl SalesAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, units: u64) {
        *self.units_by_product.entry(name.into()).or_insert(0) += units;
    }

    pub fn units_sold(&self, name: &str) -> u64 {
        self.units_by_product.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.units_by_product.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units_by_product.is_empty()
    }

    pub fn top_sellers(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.units_by_product.iter().map(|(name, units)| (name.as_str(), *units)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

impl FromIterator<(String, u64)> for SalesAggregate {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut aggregate = Self::new();
        for (name, units) in iter {
            aggregate.record(name, units);
        }
        aggregate
    }
}
