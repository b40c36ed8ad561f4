use std::process::ExitCode;

fn main() -> ExitCode {
    assortment_cli::run()
}
