//! Run orchestration: ingest every source, score, explain, truncate.

mod session;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use session::{FeedbackRecord, SessionState};

use crate::domain::competitor::CompetitorSummary;
use crate::domain::product::VendorCatalog;
use crate::domain::profile::StoreProfile;
use crate::domain::sales::SalesAggregate;
use crate::domain::sentiment::SentimentSummary;
use crate::errors::DataContractError;
use crate::ingest::{
    CompetitorAdapter, ProfileAdapter, SalesAdapter, SentimentAdapter, SourceAdapter, SourceKind,
    VendorCatalogAdapter,
};
use crate::rationale::RationaleGenerator;
use crate::scoring::{Scorer, ScoringInput};

/// Locations of the uploaded source files. Any of them may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub vendor: Option<PathBuf>,
    pub sales: Option<PathBuf>,
    pub survey: Option<PathBuf>,
    pub trend: Option<PathBuf>,
    pub profile: Option<PathBuf>,
    pub competitor: Option<PathBuf>,
}

impl SourcePaths {
    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::Vendor => self.vendor.as_deref(),
            SourceKind::Sales => self.sales.as_deref(),
            SourceKind::Survey => self.survey.as_deref(),
            SourceKind::Trend => self.trend.as_deref(),
            SourceKind::Profile => self.profile.as_deref(),
            SourceKind::Competitor => self.competitor.as_deref(),
        }
    }
}

/// A source that failed to load and was replaced by its empty default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestedSources {
    pub catalog: VendorCatalog,
    pub sales: SalesAggregate,
    pub survey: SentimentSummary,
    pub trend: SentimentSummary,
    pub profile: StoreProfile,
    pub competitor: CompetitorSummary,
    pub failures: Vec<SourceFailure>,
}

/// Loads every named source. A failing source is logged, recorded and
/// replaced by its empty default; the others are unaffected.
pub fn ingest_sources(paths: &SourcePaths) -> IngestedSources {
    let mut failures = Vec::new();

    let catalog = load_isolated(&VendorCatalogAdapter, paths, &mut failures);
    let sales = load_isolated(&SalesAdapter, paths, &mut failures);
    let survey = load_isolated(&SentimentAdapter::survey(), paths, &mut failures);
    let trend = load_isolated(&SentimentAdapter::trend(), paths, &mut failures);
    let profile = load_isolated(&ProfileAdapter, paths, &mut failures);
    let competitor = load_isolated(&CompetitorAdapter, paths, &mut failures);

    IngestedSources { catalog, sales, survey, trend, profile, competitor, failures }
}

fn load_isolated<A>(adapter: &A, paths: &SourcePaths, failures: &mut Vec<SourceFailure>) -> A::Record
where
    A: SourceAdapter,
    A::Record: Default,
{
    let kind = adapter.kind();
    let Some(path) = paths.get(kind) else {
        return A::Record::default();
    };

    match adapter.load(path) {
        Ok(record) => record,
        Err(error) => {
            warn!(
                event_name = "ingest.source_failed",
                source = %kind,
                path = %path.display(),
                error = %error,
                "source failed to load, continuing with empty default"
            );
            failures.push(SourceFailure { source: kind, message: error.to_string() });
            A::Record::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssortmentPipeline {
    scorer: Scorer,
    rationale: RationaleGenerator,
}

impl AssortmentPipeline {
    pub fn new(top_k: usize) -> Self {
        Self { scorer: Scorer::new(), rationale: RationaleGenerator::new(top_k) }
    }

    /// Produces a fresh session from the ingested sources. A non-empty
    /// `store_id_override` replaces the profile's store id.
    pub fn run(
        &self,
        sources: IngestedSources,
        store_id_override: Option<&str>,
    ) -> Result<SessionState, DataContractError> {
        let IngestedSources { catalog, sales, survey, trend, mut profile, competitor, failures } =
            sources;

        if let Some(store_id) = store_id_override.map(str::trim).filter(|id| !id.is_empty()) {
            profile.store_id = store_id.to_string();
        }

        let session_id = uuid::Uuid::new_v4();
        info!(
            event_name = "pipeline.run.started",
            run_id = %session_id,
            store_id = %profile.store_id,
            product_count = catalog.len(),
            failed_sources = failures.len(),
            "assortment run started"
        );

        let ranked = self.scorer.rank(ScoringInput {
            catalog: &catalog,
            sales: &sales,
            survey: &survey,
            trend: &trend,
            store_themes: &profile.themes,
        })?;
        let output = self.rationale.generate(&ranked, &profile, &survey, &trend);

        info!(
            event_name = "pipeline.run.completed",
            run_id = %session_id,
            store_id = %profile.store_id,
            ranked_count = ranked.len(),
            selected_count = output.products.len(),
            "assortment run completed"
        );

        Ok(SessionState {
            run_id: session_id,
            generated_at: chrono::Utc::now(),
            store_id: profile.store_id.clone(),
            profile,
            catalog,
            sales,
            survey,
            trend,
            competitor,
            ranked,
            output,
            source_failures: failures,
            feedback_history: Vec::new(),
        })
    }

    /// Convenience for callers holding paths: ingest, then run.
    pub fn run_from_paths(
        &self,
        paths: &SourcePaths,
        store_id_override: Option<&str>,
    ) -> Result<SessionState, DataContractError> {
        self.run(ingest_sources(paths), store_id_override)
    }
}
