mod app;
mod cli;
mod commands;
mod config;
mod exit_codes;
mod note;
mod output;
mod prompt;
mod sanitize;
mod store;
mod strength;
mod version;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::run()
}
