use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use assortment_core::config::LlmConfig;
use assortment_core::{FeedbackReconciler, InterpreterFailure, Reconciliation, SessionState};

use crate::interpreter::LlmInterpreter;
use crate::llm::{HttpLlmClient, LlmClient};

/// Applies operator feedback to a session through the configured LLM.
pub struct FeedbackRuntime {
    reconciler: FeedbackReconciler<LlmInterpreter>,
}

impl FeedbackRuntime {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = HttpLlmClient::from_config(config)?;
        Ok(Self::with_client(Arc::new(client), Duration::from_secs(config.timeout_secs)))
    }

    pub fn with_client(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { reconciler: FeedbackReconciler::new(LlmInterpreter::new(client, timeout)) }
    }

    /// Reconciles against the session's current output. The session itself is
    /// left untouched; callers apply the result with [`SessionState::accept`].
    pub async fn handle_feedback(
        &self,
        session: &SessionState,
        instruction: &str,
    ) -> Result<Reconciliation, InterpreterFailure> {
        self.reconciler.reconcile(session, &session.output, instruction).await
    }
}
