pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod rationale;
pub mod reconcile;
pub mod scoring;

pub use domain::assortment::{AssortmentOutput, RankedList, ScoredProduct, DEFAULT_TOP_K};
pub use domain::competitor::CompetitorSummary;
pub use domain::product::{Product, VendorCatalog};
pub use domain::profile::StoreProfile;
pub use domain::sales::SalesAggregate;
pub use domain::sentiment::SentimentSummary;
pub use errors::{
    ApplicationError, DataContractError, DomainError, InterfaceError, InterpreterFailure,
};
pub use ingest::{SourceAdapter, SourceKind};
pub use pipeline::{
    ingest_sources, AssortmentPipeline, FeedbackRecord, IngestedSources, SessionState,
    SourceFailure, SourcePaths,
};
pub use rationale::RationaleGenerator;
pub use reconcile::{
    FeedbackOutcome, FeedbackReconciler, InterpretRequest, Interpreter, Reconciliation,
};
pub use scoring::{Scorer, ScoringInput, ScoringWeights};
