use serde::{Deserialize, Serialize};

use crate::domain::product::dedupe_themes;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub store_id: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub college_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub school_type: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub housing_type: Option<String>,
    #[serde(default)]
    pub enrollment_size: Option<String>,
}

impl StoreProfile {
    pub fn new(store_id: impl Into<String>, themes: Vec<String>) -> Self {
        Self { store_id: store_id.into(), themes: dedupe_themes(themes), ..Self::default() }
    }
}
