use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SourceFailure;
use crate::domain::assortment::{AssortmentOutput, RankedList};
use crate::domain::competitor::CompetitorSummary;
use crate::domain::product::VendorCatalog;
use crate::domain::profile::StoreProfile;
use crate::domain::sales::SalesAggregate;
use crate::domain::sentiment::SentimentSummary;
use crate::errors::ApplicationError;
use crate::reconcile::{FeedbackOutcome, Reconciliation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub instruction: String,
    pub outcome: FeedbackOutcome,
    pub recorded_at: DateTime<Utc>,
}

/// Everything known about the most recent run. Replaced wholesale by each run;
/// only [`SessionState::accept`] amends it afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub store_id: String,
    pub profile: StoreProfile,
    pub catalog: VendorCatalog,
    pub sales: SalesAggregate,
    pub survey: SentimentSummary,
    pub trend: SentimentSummary,
    pub competitor: CompetitorSummary,
    pub ranked: RankedList,
    pub output: AssortmentOutput,
    #[serde(default)]
    pub source_failures: Vec<SourceFailure>,
    #[serde(default)]
    pub feedback_history: Vec<FeedbackRecord>,
}

impl SessionState {
    pub fn accept(&mut self, reconciliation: Reconciliation) {
        self.feedback_history.push(FeedbackRecord {
            instruction: reconciliation.instruction,
            outcome: reconciliation.outcome,
            recorded_at: Utc::now(),
        });
        self.output = reconciliation.output;
    }

    pub fn save(&self, path: &Path) -> Result<(), ApplicationError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| {
                ApplicationError::Persistence(format!(
                    "failed to create session directory `{}`: {error}",
                    parent.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|error| {
            ApplicationError::Persistence(format!("failed to serialize session: {error}"))
        })?;
        fs::write(path, json).map_err(|error| {
            ApplicationError::Persistence(format!(
                "failed to write session `{}`: {error}",
                path.display()
            ))
        })
    }

    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            ApplicationError::Persistence(format!(
                "failed to read session `{}`: {error}",
                path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|error| {
            ApplicationError::Persistence(format!(
                "session `{}` is not a valid session snapshot: {error}",
                path.display()
            ))
        })
    }
}
