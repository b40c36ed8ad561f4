use crate::domain::product::{Product, VendorCatalog};
use crate::errors::DataContractError;
use crate::ingest::csv::CsvTable;
use crate::ingest::{SourceAdapter, SourceKind};

/// Vendor catalog CSV: `name, category, sub_category, price, themes`, where
/// `themes` is a comma-separated list inside one cell.
///
/// Rows are kept in file order. Product names are passed through as supplied;
/// an empty name is left for the scorer to reject.
#[derive(Clone, Copy, Debug, Default)]
pub struct VendorCatalogAdapter;

impl SourceAdapter for VendorCatalogAdapter {
    type Record = VendorCatalog;

    fn kind(&self) -> SourceKind {
        SourceKind::Vendor
    }

    fn parse(&self, raw: &str) -> Result<VendorCatalog, DataContractError> {
        let table = CsvTable::parse(SourceKind::Vendor, raw)?;
        let [name, category, sub_category, price, themes] =
            table.require_columns(["name", "category", "sub_category", "price", "themes"])?;

        let mut products = Vec::new();
        for row in table.rows() {
            let unit_price = row.number(price, "price")?;
            if unit_price < 0.0 {
                return Err(DataContractError::Malformed {
                    kind: SourceKind::Vendor,
                    message: format!("row {}: price must not be negative", row.line()),
                });
            }

            products.push(Product::new(
                row.text(name),
                row.text(category),
                row.text(sub_category),
                unit_price,
                split_themes(row.text(themes)),
            ));
        }

        Ok(VendorCatalog::new(products))
    }
}

fn split_themes(cell: &str) -> Vec<String> {
    cell.split(',').map(str::trim).filter(|theme| !theme.is_empty()).map(str::to_string).collect()
}
