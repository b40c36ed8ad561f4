//! Source adapters that turn uploaded files into normalized records.
//!
//! Every adapter fails independently with a [`DataContractError`] naming the
//! source and the absent column or field; the pipeline decides what to do with
//! a failed source.

mod competitor;
mod csv;
mod profile;
mod sales;
mod sentiment;
mod vendor;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DataContractError;

pub use competitor::CompetitorAdapter;
pub use profile::ProfileAdapter;
pub use sales::SalesAdapter;
pub use sentiment::SentimentAdapter;
pub use vendor::VendorCatalogAdapter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Vendor,
    Sales,
    Survey,
    Trend,
    Profile,
    Competitor,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Vendor,
        SourceKind::Sales,
        SourceKind::Survey,
        SourceKind::Trend,
        SourceKind::Profile,
        SourceKind::Competitor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Sales => "sales",
            Self::Survey => "survey",
            Self::Trend => "trend",
            Self::Profile => "profile",
            Self::Competitor => "competitor",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait SourceAdapter {
    type Record;

    fn kind(&self) -> SourceKind;

    fn parse(&self, raw: &str) -> Result<Self::Record, DataContractError>;

    fn load(&self, path: &Path) -> Result<Self::Record, DataContractError> {
        let raw = fs::read_to_string(path).map_err(|error| DataContractError::Io {
            kind: self.kind(),
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        self.parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{SourceAdapter, SourceKind, VendorCatalogAdapter};
    use crate::errors::DataContractError;

    #[test]
    fn source_kinds_render_lowercase() {
        let names: Vec<String> = SourceKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["vendor", "sales", "survey", "trend", "profile", "competitor"]);
    }

    #[test]
    fn unreadable_file_is_reported_as_io_for_that_source() {
        let error = VendorCatalogAdapter
            .load(Path::new("/definitely/not/here/vendor.csv"))
            .expect_err("missing file should fail");

        assert!(matches!(
            error,
            DataContractError::Io { kind: SourceKind::Vendor, ref path, .. } if path.ends_with("vendor.csv")
        ));
    }
}
