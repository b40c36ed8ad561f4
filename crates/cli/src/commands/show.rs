use std::path::Path;

use assortment_core::SessionState;

use crate::commands::{render_products, CommandResult, EXIT_PERSISTENCE};

pub fn run(session: &Path) -> CommandResult {
    let state = match SessionState::load(session) {
        Ok(state) => state,
        Err(error) => {
            return CommandResult::failure(
                "show",
                "persistence",
                error.into_interface("show").message().to_string(),
                EXIT_PERSISTENCE,
            );
        }
    };

    let mut lines = vec![format!(
        "store `{}`, run {} generated {}",
        state.store_id,
        state.run_id,
        state.generated_at.to_rfc3339()
    )];
    for failure in &state.source_failures {
        lines.push(format!("source {} skipped: {}", failure.source, failure.message));
    }
    for record in &state.feedback_history {
        lines.push(format!(
            "feedback {:?} at {}: {}",
            record.outcome,
            record.recorded_at.to_rfc3339(),
            record.instruction
        ));
    }
    lines.push(String::new());
    lines.push(state.output.rationale.clone());
    lines.push(String::new());
    lines.push(render_products(&state.output.products));

    CommandResult::success("show", lines.join("\n"))
}
