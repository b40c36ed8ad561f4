//! LLM side of the assortment engine
//!
//! Turns free-text planner feedback into candidate assortments:
//! - `llm` talks to OpenAI, Anthropic or Ollama over HTTP
//! - `interpreter` builds the prompt and parses the JSON reply
//! - `runtime` wires both into the core feedback reconciler
//!
//! The model only proposes. Scoring and the decision between answering and
//! revising stay in `assortment-core`.

pub mod interpreter;
pub mod llm;
pub mod runtime;

pub use interpreter::LlmInterpreter;
pub use llm::{HttpLlmClient, LlmClient};
pub use runtime::FeedbackRuntime;
