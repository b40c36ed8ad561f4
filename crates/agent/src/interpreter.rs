//! LLM-backed feedback interpreter

use std::sync::Arc;
use std::time::Duration;

use assortment_core::reconcile::{InterpretRequest, Interpreter};
use assortment_core::{InterpreterFailure, SessionState};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm::LlmClient;

const TOP_SELLER_LIMIT: usize = 5;

/// Builds the planner-feedback prompt and parses the model's JSON reply.
/// The model only proposes; the reconciler decides what the reply means.
pub struct LlmInterpreter {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl LlmInterpreter {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl Interpreter for LlmInterpreter {
    async fn interpret(
        &self,
        request: InterpretRequest<'_>,
    ) -> Result<serde_json::Value, InterpreterFailure> {
        let prompt = build_prompt(&request)?;

        info!(
            event_name = "interpreter.request",
            run_id = %request.context.run_id,
            store_id = %request.context.store_id,
            prompt_chars = prompt.len(),
            "asking llm to interpret feedback"
        );

        let reply = match tokio::time::timeout(self.timeout, self.client.complete(&prompt)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(error)) => return Err(InterpreterFailure::Transport(format!("{error:#}"))),
            Err(_) => {
                warn!(
                    event_name = "interpreter.timeout",
                    run_id = %request.context.run_id,
                    timeout_secs = self.timeout.as_secs(),
                    "llm did not answer in time"
                );
                return Err(InterpreterFailure::Timeout(self.timeout.as_secs()));
            }
        };

        parse_reply(&reply)
    }
}

fn build_prompt(request: &InterpretRequest<'_>) -> Result<String, InterpreterFailure> {
    let products = serde_json::to_string_pretty(&request.current.products)
        .map_err(|error| InterpreterFailure::Transport(format!("could not encode products: {error}")))?;
    let context = serde_json::to_string_pretty(request.context)
        .map_err(|error| InterpreterFailure::Transport(format!("could not encode session: {error}")))?;
    let signals = signals(request.context);

    Ok(format!(
        r#"You help a campus store planner refine a product assortment.

Current product list ([name, score] pairs):
{products}

Current rationale:
"{rationale}"

Planner feedback:
"{instruction}"

Key signals:
{signals}

Session data (store profile, vendor catalog, sales, survey and trend summaries, competitor prices):
{context}

Rules:
- A question, or feedback that names no product change, gets an answer in "rationale" and the product list returned exactly as given.
- Change the list only when the feedback clearly asks for it with product names that exist or make sense, and explain the change in "rationale".
- When the feedback is unclear, ask for clarification in "rationale" and keep the list.
- When asked for more products or improvements, propose them with reasons.
- Answer questions about competitors, trends and products from the session data.
- Reply with JSON only, exactly in this shape:
{{"products": [["name", score], ...], "rationale": "..."}}
"#,
        rationale = request.current.rationale,
        instruction = request.instruction,
    ))
}

fn signals(session: &SessionState) -> String {
    let top_sellers = session
        .sales
        .top_sellers(TOP_SELLER_LIMIT)
        .into_iter()
        .map(|(name, units)| format!("{name} ({units} units)"))
        .collect::<Vec<_>>();
    let lines = [
        ("Best sellers", top_sellers.join(", ")),
        ("Survey keywords", session.survey.active_keywords().join(", ")),
        ("Trend keywords", session.trend.active_keywords().join(", ")),
    ];

    lines
        .iter()
        .map(|(label, value)| {
            let value = if value.is_empty() { "none" } else { value.as_str() };
            format!("- {label}: {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Models often wrap JSON in a markdown fence; anything else must be bare JSON.
fn parse_reply(reply: &str) -> Result<serde_json::Value, InterpreterFailure> {
    let body = strip_code_fence(reply.trim());
    serde_json::from_str(body).map_err(|error| {
        InterpreterFailure::UnparsableResponse(format!("{error} (reply began {:?})", preview(body)))
    })
}

fn strip_code_fence(reply: &str) -> &str {
    let Some(rest) = reply.strip_prefix("```") else {
        return reply;
    };
    // Drop an info string such as `json` on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn preview(body: &str) -> String {
    body.chars().take(60).collect()
}
