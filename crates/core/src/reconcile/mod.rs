//! Feedback reconciliation
//!
//! Sends an operator instruction plus the full session context to an
//! [`Interpreter`] and decides whether the candidate it returns revises the
//! assortment or only answers a question about it.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::assortment::{AssortmentOutput, ScoredProduct};
use crate::errors::InterpreterFailure;
use crate::pipeline::SessionState;

/// Everything an interpreter sees for one feedback turn.
#[derive(Debug, Clone, Copy)]
pub struct InterpretRequest<'a> {
    pub context: &'a SessionState,
    pub current: &'a AssortmentOutput,
    pub instruction: &'a str,
}

/// Turns a free-text instruction into a candidate assortment.
///
/// Implementations return the candidate as raw JSON; shape validation happens
/// in [`FeedbackReconciler`] so every interpreter is held to the same contract.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(
        &self,
        request: InterpretRequest<'_>,
    ) -> Result<serde_json::Value, InterpreterFailure>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// Product list unchanged; the rationale carries the answer.
    Answered,
    /// Product list differs from the current one.
    Revised,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub instruction: String,
    pub outcome: FeedbackOutcome,
    pub output: AssortmentOutput,
}

pub struct FeedbackReconciler<I> {
    interpreter: I,
}

impl<I: Interpreter> FeedbackReconciler<I> {
    pub fn new(interpreter: I) -> Self {
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    /// On failure the caller's current output stays authoritative; nothing here
    /// mutates it.
    pub async fn reconcile(
        &self,
        context: &SessionState,
        current: &AssortmentOutput,
        instruction: &str,
    ) -> Result<Reconciliation, InterpreterFailure> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(InterpreterFailure::EmptyInstruction);
        }

        let raw = self
            .interpreter
            .interpret(InterpretRequest { context, current, instruction })
            .await
            .map_err(|error| {
                warn!(
                    event_name = "feedback.interpreter_failed",
                    run_id = %context.run_id,
                    error = %error,
                    "interpreter did not return a candidate"
                );
                error
            })?;
        let candidate = parse_candidate(raw)?;

        // Order matters: a reorder is a revision.
        let (outcome, output) = if candidate.products == current.products {
            (
                FeedbackOutcome::Answered,
                AssortmentOutput { products: current.products.clone(), rationale: candidate.rationale },
            )
        } else {
            (FeedbackOutcome::Revised, candidate)
        };

        info!(
            event_name = "feedback.reconciled",
            run_id = %context.run_id,
            outcome = ?outcome,
            product_count = output.products.len(),
            "feedback reconciled"
        );

        Ok(Reconciliation { instruction: instruction.to_string(), outcome, output })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateEntry {
    Pair(String, f64),
    Named { name: String, score: f64 },
}

#[derive(Deserialize)]
struct RawCandidate {
    products: Vec<CandidateEntry>,
    rationale: String,
}

/// Validates an interpreter candidate. Products may be `[name, score]` pairs
/// or `{"name", "score"}` objects; names must be non-empty and unique.
pub fn parse_candidate(raw: serde_json::Value) -> Result<AssortmentOutput, InterpreterFailure> {
    let candidate: RawCandidate = serde_json::from_value(raw)
        .map_err(|error| InterpreterFailure::InvalidCandidate(error.to_string()))?;

    let mut seen = HashSet::with_capacity(candidate.products.len());
    let mut products = Vec::with_capacity(candidate.products.len());
    for (index, entry) in candidate.products.into_iter().enumerate() {
        let (name, score) = match entry {
            CandidateEntry::Pair(name, score) | CandidateEntry::Named { name, score } => (name, score),
        };
        if name.trim().is_empty() {
            return Err(InterpreterFailure::InvalidCandidate(format!(
                "product #{index} has an empty name"
            )));
        }
        if !score.is_finite() {
            return Err(InterpreterFailure::InvalidCandidate(format!(
                "product `{name}` has a non-finite score"
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(InterpreterFailure::InvalidCandidate(format!(
                "product `{name}` appears more than once"
            )));
        }
        products.push(ScoredProduct::new(name, score));
    }

    Ok(AssortmentOutput { products, rationale: candidate.rationale })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::domain::product::{Product, VendorCatalog};
    use crate::domain::profile::StoreProfile;
    use crate::pipeline::{AssortmentPipeline, IngestedSources};

    struct ScriptedInterpreter {
        reply: Result<serde_json::Value, InterpreterFailure>,
        calls: AtomicUsize,
    }

    impl ScriptedInterpreter {
        fn replying(reply: Result<serde_json::Value, InterpreterFailure>) -> Self {
            Self { reply, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl Interpreter for ScriptedInterpreter {
        async fn interpret(
            &self,
            _request: InterpretRequest<'_>,
        ) -> Result<serde_json::Value, InterpreterFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn session() -> SessionState {
        let sources = IngestedSources {
            catalog: VendorCatalog::new(vec![
                Product::new("Desk Lamp", "Dorm", "Lighting", 24.0, vec!["Tech-savvy".to_string()]),
                Product::new("Mini Fridge", "Dorm", "Appliances", 99.0, Vec::new()),
            ]),
            profile: StoreProfile::new("UCLA-01", vec!["Tech-savvy".to_string()]),
            ..IngestedSources::default()
        };
        AssortmentPipeline::default().run(sources, None).expect("pipeline run")
    }

    #[tokio::test]
    async fn unchanged_products_are_an_answer_with_the_new_rationale() {
        let session = session();
        let current = session.output.clone();
        let reconciler = FeedbackReconciler::new(ScriptedInterpreter::replying(Ok(json!({
            "products": current.products,
            "rationale": "The lamp leads because it matches the Tech-savvy theme.",
        }))));

        let result = reconciler
            .reconcile(&session, &current, "why is the lamp first?")
            .await
            .expect("reconcile");

        assert_eq!(result.outcome, FeedbackOutcome::Answered);
        assert_eq!(result.output.products, current.products);
        assert_eq!(result.output.rationale, "The lamp leads because it matches the Tech-savvy theme.");
    }

    #[tokio::test]
    async fn changed_products_replace_the_current_list() {
        let session = session();
        let current = session.output.clone();
        let reconciler = FeedbackReconciler::new(ScriptedInterpreter::replying(Ok(json!({
            "products": [{"name": "Mini Fridge", "score": 3.0}],
            "rationale": "Dropped the lamp as requested.",
        }))));

        let result = reconciler.reconcile(&session, &current, "remove the lamp").await.expect("reconcile");

        assert_eq!(result.outcome, FeedbackOutcome::Revised);
        assert_eq!(result.output.products, vec![ScoredProduct::new("Mini Fridge", 3.0)]);
        assert_eq!(result.instruction, "remove the lamp");
    }

    #[tokio::test]
    async fn reordering_counts_as_a_revision() {
        let session = session();
        let current = session.output.clone();
        let mut reversed = current.products.clone();
        reversed.reverse();
        let reconciler = FeedbackReconciler::new(ScriptedInterpreter::replying(Ok(json!({
            "products": reversed,
            "rationale": "Fridge first.",
        }))));

        let result = reconciler.reconcile(&session, &current, "put the fridge first").await.expect("reconcile");

        assert_eq!(result.outcome, FeedbackOutcome::Revised);
        assert_eq!(result.output.products, reversed);
    }

    #[tokio::test]
    async fn empty_instruction_never_reaches_the_interpreter() {
        let session = session();
        let current = session.output.clone();
        let reconciler =
            FeedbackReconciler::new(ScriptedInterpreter::replying(Ok(json!({"products": [], "rationale": ""}))));

        let error = reconciler.reconcile(&session, &current, "   ").await.expect_err("empty");

        assert_eq!(error, InterpreterFailure::EmptyInstruction);
        assert_eq!(reconciler.interpreter().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_candidate_is_rejected() {
        let session = session();
        let current = session.output.clone();
        let reconciler = FeedbackReconciler::new(ScriptedInterpreter::replying(Ok(json!({
            "products": "Desk Lamp",
        }))));

        let error = reconciler.reconcile(&session, &current, "shorter list").await.expect_err("malformed");

        assert!(matches!(error, InterpreterFailure::InvalidCandidate(_)));
    }

    #[tokio::test]
    async fn interpreter_failures_pass_through_unchanged() {
        let session = session();
        let current = session.output.clone();
        let reconciler =
            FeedbackReconciler::new(ScriptedInterpreter::replying(Err(InterpreterFailure::Timeout(30))));

        let error = reconciler.reconcile(&session, &current, "anything").await.expect_err("timeout");

        assert_eq!(error, InterpreterFailure::Timeout(30));
    }

    #[test]
    fn candidate_accepts_pairs_and_objects() {
        let output = parse_candidate(json!({
            "products": [["A", 2.5], {"name": "B", "score": 1}],
            "rationale": "mixed",
        }))
        .expect("valid candidate");

        assert_eq!(output.products, vec![ScoredProduct::new("A", 2.5), ScoredProduct::new("B", 1.0)]);
    }

    #[test]
    fn candidate_rejects_empty_and_duplicate_names() {
        let empty = parse_candidate(json!({"products": [["", 1.0]], "rationale": "x"}));
        let duplicate = parse_candidate(json!({"products": [["A", 1.0], ["A", 2.0]], "rationale": "x"}));
        let missing_rationale = parse_candidate(json!({"products": []}));

        assert!(matches!(empty, Err(InterpreterFailure::InvalidCandidate(message)) if message.contains("empty name")));
        assert!(matches!(duplicate, Err(InterpreterFailure::InvalidCandidate(message)) if message.contains("more than once")));
        assert!(matches!(missing_rationale, Err(InterpreterFailure::InvalidCandidate(_))));
    }
}
