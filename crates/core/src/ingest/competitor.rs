use crate::domain::competitor::CompetitorSummary;
use crate::errors::DataContractError;
use crate::ingest::csv::CsvTable;
use crate::ingest::{SourceAdapter, SourceKind};

/// Competitor listings CSV (`name, competitor_price, source`) reduced to price
/// benchmarks and the distinct products and sources, in first-seen order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompetitorAdapter;

impl SourceAdapter for CompetitorAdapter {
    type Record = CompetitorSummary;

    fn kind(&self) -> SourceKind {
        SourceKind::Competitor
    }

    fn parse(&self, raw: &str) -> Result<CompetitorSummary, DataContractError> {
        let table = CsvTable::parse(SourceKind::Competitor, raw)?;
        let [name, price, source] = table.require_columns(["name", "competitor_price", "source"])?;

        let mut summary = CompetitorSummary::default();
        let mut prices = Vec::new();
        for row in table.rows() {
            prices.push(row.number(price, "competitor_price")?);
            push_unique(&mut summary.products, row.text(name));
            push_unique(&mut summary.sources, row.text(source));
        }

        if let Some(first) = prices.first().copied() {
            summary.min_price = prices.iter().copied().fold(first, f64::min);
            summary.max_price = prices.iter().copied().fold(first, f64::max);
            summary.avg_price = prices.iter().sum::<f64>() / prices.len() as f64;
        }

        Ok(summary)
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
