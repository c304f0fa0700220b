use std::path::PathBuf;

use panel_wizard::cli::run_cli;

fn main() {
    let definition = std::env::args_os().nth(1).map(PathBuf::from);

    if let Err(err) = run_cli(definition) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
