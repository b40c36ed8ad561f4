use std::path::{Path, PathBuf};

use assortment_agent::FeedbackRuntime;
use assortment_core::config::ConfigOverrides;
use assortment_core::export::write_export;
use assortment_core::{ApplicationError, FeedbackOutcome, InterpreterFailure, SessionState};
use tracing::info;

use crate::commands::{
    current_thread_runtime, load_config, render_products, CommandResult, EXIT_CONFIG,
    EXIT_INTERPRETER, EXIT_LLM_CLIENT, EXIT_PERSISTENCE,
};

pub fn run(
    session: PathBuf,
    instruction: &str,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> CommandResult {
    let config = match load_config("feedback", config_path, ConfigOverrides::default()) {
        Ok(config) => config,
        Err(result) => return result,
    };
    if let Err(error) = config.llm.ensure_ready() {
        return CommandResult::failure(
            "feedback",
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        );
    }

    let feedback_runtime = match FeedbackRuntime::from_config(&config.llm) {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "feedback",
                "llm_client",
                format!("failed to initialize llm client: {error:#}"),
                EXIT_LLM_CLIENT,
            );
        }
    };

    let output_dir = output_dir.unwrap_or_else(|| session_dir(&session));
    apply(&session, instruction, &feedback_runtime, &output_dir)
}

/// The export is refreshed beside the session it was derived from.
pub fn session_dir(session_file: &Path) -> PathBuf {
    match session_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Runs one feedback cycle. The session file and export are rewritten only
/// when reconciliation succeeds.
pub fn apply(
    session_file: &Path,
    instruction: &str,
    feedback_runtime: &FeedbackRuntime,
    output_dir: &Path,
) -> CommandResult {
    let mut session = match SessionState::load(session_file) {
        Ok(session) => session,
        Err(error) => return persistence_failure(error),
    };

    let runtime = match current_thread_runtime("feedback") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let reconciliation =
        match runtime.block_on(feedback_runtime.handle_feedback(&session, instruction)) {
            Ok(reconciliation) => reconciliation,
            Err(error) => {
                let error_class = match error {
                    InterpreterFailure::EmptyInstruction => "invalid_instruction",
                    _ => "interpreter",
                };
                let interface =
                    ApplicationError::from(error).into_interface(session.run_id.to_string());
                return CommandResult::failure(
                    "feedback",
                    error_class,
                    format!("{} ({})", interface.user_message(), interface.message()),
                    EXIT_INTERPRETER,
                );
            }
        };

    let outcome = reconciliation.outcome;
    session.accept(reconciliation);

    let written = session
        .save(session_file)
        .and_then(|()| write_export(output_dir, &session.store_id, &session.output.products));
    let export = match written {
        Ok(path) => path,
        Err(error) => return persistence_failure(error),
    };

    info!(
        event_name = "cli.feedback.applied",
        run_id = %session.run_id,
        outcome = ?outcome,
        feedback_count = session.feedback_history.len(),
        "feedback applied"
    );

    let headline = match outcome {
        FeedbackOutcome::Answered => "answered; product list unchanged",
        FeedbackOutcome::Revised => "revised product list",
    };
    CommandResult::success(
        "feedback",
        format!(
            "{headline}\nexport: {}\n\n{}\n\n{}",
            export.display(),
            session.output.rationale,
            render_products(&session.output.products)
        ),
    )
}

fn persistence_failure(error: ApplicationError) -> CommandResult {
    CommandResult::failure(
        "feedback",
        "persistence",
        error.into_interface("feedback").message().to_string(),
        EXIT_PERSISTENCE,
    )
}
