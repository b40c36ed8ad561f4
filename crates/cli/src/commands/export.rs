use std::path::PathBuf;

use assortment_core::config::ConfigOverrides;
use assortment_core::export::write_export;
use assortment_core::SessionState;

use crate::commands::{load_config, CommandResult, EXIT_PERSISTENCE};

pub fn run(session: PathBuf, output_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> CommandResult {
    let overrides = ConfigOverrides { output_dir, ..ConfigOverrides::default() };
    let config = match load_config("export", config_path, overrides) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let written = SessionState::load(&session).and_then(|state| {
        write_export(&config.assortment.output_dir, &state.store_id, &state.output.products)
            .map(|path| (path, state.output.products.len()))
    });

    match written {
        Ok((path, count)) => {
            CommandResult::success("export", format!("wrote {count} products to {}", path.display()))
        }
        Err(error) => CommandResult::failure(
            "export",
            "persistence",
            error.into_interface("export").message().to_string(),
            EXIT_PERSISTENCE,
        ),
    }
}
