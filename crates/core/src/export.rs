//! CSV export of the authoritative product list

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::assortment::ScoredProduct;
use crate::errors::ApplicationError;

pub const EXPORT_HEADER: &str = "Product,Score";

pub fn export_path(output_dir: &Path, store_id: &str) -> PathBuf {
    output_dir.join(format!("{}_updated_assortment.csv", file_stem(store_id)))
}

pub fn session_path(output_dir: &Path, store_id: &str) -> PathBuf {
    output_dir.join(format!("{}_session.json", file_stem(store_id)))
}

/// Scores use the shortest round-trip form, so `1.0` stays `1.0` and `2.52` stays `2.52`.
pub fn render_csv(products: &[ScoredProduct]) -> String {
    let mut csv = String::from(EXPORT_HEADER);
    csv.push('\n');
    for product in products {
        csv.push_str(&escape_cell(&product.name));
        csv.push(',');
        csv.push_str(&format!("{:?}", product.score));
        csv.push('\n');
    }
    csv
}

pub fn write_export(
    output_dir: &Path,
    store_id: &str,
    products: &[ScoredProduct],
) -> Result<PathBuf, ApplicationError> {
    fs::create_dir_all(output_dir).map_err(|error| {
        ApplicationError::Persistence(format!(
            "failed to create output directory `{}`: {error}",
            output_dir.display()
        ))
    })?;

    let path = export_path(output_dir, store_id);
    fs::write(&path, render_csv(products)).map_err(|error| {
        ApplicationError::Persistence(format!("failed to write export `{}`: {error}", path.display()))
    })?;

    info!(
        event_name = "export.written",
        store_id,
        path = %path.display(),
        product_count = products.len(),
        "assortment exported"
    );
    Ok(path)
}

fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Store ids come from uploaded data; keep them from escaping the output directory.
fn file_stem(store_id: &str) -> String {
    let stem: String = store_id
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "assortment".to_string()
    } else {
        stem
    }
}
