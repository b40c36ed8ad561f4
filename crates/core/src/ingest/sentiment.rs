use crate::domain::sentiment::SentimentSummary;
use crate::errors::DataContractError;
use crate::ingest::{SourceAdapter, SourceKind};

/// Survey or trend summary already produced by the external sentiment analyzer.
///
/// The JSON object may omit `average_sentiment`; the scorer then applies its
/// neutral default. A non-numeric sentiment is malformed.
#[derive(Clone, Copy, Debug)]
pub struct SentimentAdapter {
    kind: SourceKind,
}

impl SentimentAdapter {
    pub fn survey() -> Self {
        Self { kind: SourceKind::Survey }
    }

    pub fn trend() -> Self {
        Self { kind: SourceKind::Trend }
    }
}

impl SourceAdapter for SentimentAdapter {
    type Record = SentimentSummary;

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn parse(&self, raw: &str) -> Result<SentimentSummary, DataContractError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|error| {
            DataContractError::Malformed { kind: self.kind, message: error.to_string() }
        })?;
        if !value.is_object() {
            return Err(DataContractError::Malformed {
                kind: self.kind,
                message: "expected a JSON object".to_string(),
            });
        }

        serde_json::from_value(value).map_err(|error| DataContractError::Malformed {
            kind: self.kind,
            message: error.to_string(),
        })
    }
}
