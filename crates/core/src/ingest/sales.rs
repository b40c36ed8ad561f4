use crate::domain::sales::SalesAggregate;
use crate::errors::DataContractError;
use crate::ingest::csv::CsvTable;
use crate::ingest::{SourceAdapter, SourceKind};

/// Sales CSV with at least `name, total_units_sold`; rows for the same name are summed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SalesAdapter;

impl SourceAdapter for SalesAdapter {
    type Record = SalesAggregate;

    fn kind(&self) -> SourceKind {
        SourceKind::Sales
    }

    fn parse(&self, raw: &str) -> Result<SalesAggregate, DataContractError> {
        let table = CsvTable::parse(SourceKind::Sales, raw)?;
        let [name, units] = table.require_columns(["name", "total_units_sold"])?;

        let mut aggregate = SalesAggregate::new();
        for row in table.rows() {
            let value = row.number(units, "total_units_sold")?;
            if value < 0.0 || value.fract() != 0.0 {
                return Err(DataContractError::Malformed {
                    kind: SourceKind::Sales,
                    message: format!(
                        "row {}: total_units_sold must be a non-negative whole number",
                        row.line()
                    ),
                });
            }
            aggregate.record(row.text(name), value as u64);
        }

        Ok(aggregate)
    }
}
