mod config;
mod doc;
mod inspect;
mod links;
mod open;
mod seal;

use crate::app::AppContext;
use crate::{cli, exit_codes, store};
use std::path::PathBuf;
use std::process::ExitCode;

pub fn dispatch(command: cli::Commands, ctx: &AppContext) -> ExitCode {
    match command {
        cli::Commands::Seal(args) => seal::run(args, ctx),
        cli::Commands::Open(args) => open::run(args, ctx),
        cli::Commands::Inspect(args) => inspect::run(args, ctx),
        cli::Commands::Links(args) => links::run(args, ctx),
        cli::Commands::Doc(args) => doc::run(args, ctx),
        cli::Commands::Config(args) => config::run(args, ctx),
    }
}

fn resolve_data_dir(ctx: &AppContext) -> Result<PathBuf, ExitCode> {
    store::data_dir(ctx.data_dir.as_deref()).map_err(|error| {
        eprintln!("Error: {error}");
        exit_codes::exit_code_for_store_error(&error)
    })
}

fn load_settings() -> Result<crate::config::Settings, ExitCode> {
    crate::config::load().map_err(|error| {
        eprintln!("Error: {error}");
        exit_codes::exit_code_for_config_error(&error)
    })
}

fn not_a_note_link(url: &str) -> ExitCode {
    eprintln!("Error: '{url}' is not a secure note link (no #note= fragment)");
    ExitCode::from(exit_codes::EXIT_USAGE)
}
