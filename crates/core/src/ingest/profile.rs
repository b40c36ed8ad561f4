use serde_json::{Map, Value};

use crate::domain::profile::StoreProfile;
use crate::errors::DataContractError;
use crate::ingest::{SourceAdapter, SourceKind};

const REQUIRED_FIELDS: [&str; 8] = [
    "store_id",
    "college_name",
    "region",
    "school_type",
    "themes",
    "season",
    "housing_type",
    "enrollment_size",
];

/// College profile JSON. Every descriptive field must be present even though
/// only `store_id` and `themes` drive scoring.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileAdapter;

impl SourceAdapter for ProfileAdapter {
    type Record = StoreProfile;

    fn kind(&self) -> SourceKind {
        SourceKind::Profile
    }

    fn parse(&self, raw: &str) -> Result<StoreProfile, DataContractError> {
        let value: Value = serde_json::from_str(raw).map_err(|error| DataContractError::Malformed {
            kind: SourceKind::Profile,
            message: error.to_string(),
        })?;
        let Value::Object(fields) = value else {
            return Err(malformed("expected a JSON object"));
        };

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !fields.contains_key(**field)) {
            return Err(DataContractError::MissingField {
                kind: SourceKind::Profile,
                field: (*missing).to_string(),
            });
        }

        let themes = match &fields["themes"] {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| malformed("`themes` must be a list of strings"))?,
            _ => return Err(malformed("`themes` must be a list of strings")),
        };

        let mut profile = StoreProfile::new(scalar(&fields, "store_id").unwrap_or_default(), themes);
        profile.college_name = scalar(&fields, "college_name");
        profile.region = scalar(&fields, "region");
        profile.school_type = scalar(&fields, "school_type");
        profile.season = scalar(&fields, "season");
        profile.housing_type = scalar(&fields, "housing_type");
        profile.enrollment_size = scalar(&fields, "enrollment_size");
        Ok(profile)
    }
}

fn scalar(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn malformed(message: &str) -> DataContractError {
    DataContractError::Malformed { kind: SourceKind::Profile, message: message.to_string() }
}

#[cfg(test)]
mod tests {
    use super::ProfileAdapter;
    use crate::errors::DataContractError;
    use crate::ingest::{SourceAdapter, SourceKind};

    const PROFILE: &str = r#"{
        "store_id": "UCLA-001",
        "college_name": "UCLA",
        "region": "West",
        "school_type": "STEM",
        "themes": ["Tech-savvy", "Climate-conscious", "Tech-savvy"],
        "season": "Fall",
        "housing_type": "Dorm",
        "enrollment_size": 46000
    }"#;

    #[test]
    fn parses_identity_themes_and_descriptive_fields() {
        let profile = ProfileAdapter.parse(PROFILE).expect("profile");

        assert_eq!(profile.store_id, "UCLA-001");
        assert_eq!(profile.themes, vec!["Tech-savvy".to_string(), "Climate-conscious".to_string()]);
        assert_eq!(profile.college_name.as_deref(), Some("UCLA"));
        assert_eq!(profile.enrollment_size.as_deref(), Some("46000"));
    }

    #[test]
    fn missing_required_field_is_named() {
        let error = ProfileAdapter
            .parse(r#"{"store_id": "X", "themes": []}"#)
            .expect_err("missing fields");

        assert_eq!(
            error,
            DataContractError::MissingField {
                kind: SourceKind::Profile,
                field: "college_name".to_string(),
            }
        );
    }

    #[test]
    fn non_string_themes_are_malformed() {
        let raw = PROFILE.replace(r#"["Tech-savvy", "Climate-conscious", "Tech-savvy"]"#, "[1, 2]");
        let error = ProfileAdapter.parse(&raw).expect_err("numeric themes");

        assert!(matches!(error, DataContractError::Malformed { kind: SourceKind::Profile, .. }));
    }
}
