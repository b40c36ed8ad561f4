use std::path::PathBuf;

use assortment_core::config::ConfigOverrides;
use assortment_core::export::{session_path, write_export};
use assortment_core::{ApplicationError, AssortmentPipeline, SourcePaths};
use tracing::{info, warn};

use crate::commands::{
    load_config, render_products, CommandResult, EXIT_DATA_CONTRACT, EXIT_PERSISTENCE,
};

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub sources: SourcePaths,
    pub store_id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub config_path: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> CommandResult {
    let overrides =
        ConfigOverrides { output_dir: args.output_dir, top_k: args.top_k, ..ConfigOverrides::default() };
    let config = match load_config("run", args.config_path, overrides) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let pipeline = AssortmentPipeline::new(config.assortment.top_k);
    let session = match pipeline.run_from_paths(&args.sources, args.store_id.as_deref()) {
        Ok(session) => session,
        Err(error) => {
            let source = error.source_kind();
            warn!(event_name = "cli.run.halted", source = %source, error = %error, "run halted");
            let run_error = ApplicationError::from(error).into_interface("run");
            return CommandResult::failure(
                "run",
                "data_contract",
                format!("{source} source halted the run: {} ({})", run_error.user_message(), run_error.message()),
                EXIT_DATA_CONTRACT,
            );
        }
    };

    let output_dir = &config.assortment.output_dir;
    let snapshot = session_path(output_dir, &session.store_id);
    let written = session
        .save(&snapshot)
        .and_then(|()| write_export(output_dir, &session.store_id, &session.output.products));
    let export = match written {
        Ok(path) => path,
        Err(error) => {
            return CommandResult::failure(
                "run",
                "persistence",
                error.into_interface(session.run_id.to_string()).message().to_string(),
                EXIT_PERSISTENCE,
            );
        }
    };

    info!(
        event_name = "cli.run.completed",
        run_id = %session.run_id,
        store_id = %session.store_id,
        session = %snapshot.display(),
        export = %export.display(),
        "run written"
    );

    let mut lines = vec![
        format!("run {} for store `{}`", session.run_id, session.store_id),
        format!(
            "ranked {} products, showing top {}",
            session.ranked.len(),
            session.output.products.len()
        ),
    ];
    for failure in &session.source_failures {
        lines.push(format!("source {} skipped: {}", failure.source, failure.message));
    }
    lines.push(format!("session: {}", snapshot.display()));
    lines.push(format!("export: {}", export.display()));
    lines.push(String::new());
    lines.push(session.output.rationale.clone());
    lines.push(String::new());
    lines.push(render_products(&session.output.products));

    CommandResult::success("run", lines.join("\n"))
}
