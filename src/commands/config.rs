use crate::app::AppContext;
use crate::config::{self, Settings, SettingsUpdate};
use crate::{cli, exit_codes, output};
use serde_json::json;
use std::process::ExitCode;

pub fn run(args: cli::ConfigArgs, ctx: &AppContext) -> ExitCode {
    match args.command {
        cli::ConfigCommands::Path => match config::config_path() {
            Ok(path) => output::print_value(
                path.display().to_string(),
                json!({
                    "kind": "config-path",
                    "path": path.display().to_string(),
                }),
                &ctx.output_mode,
                ctx.copy_requested,
            ),
            Err(error) => {
                eprintln!("Error: {error}");
                exit_codes::exit_code_for_config_error(&error)
            }
        },
        cli::ConfigCommands::Show => match config::load() {
            Ok(settings) => print_settings("config-show", &settings, ctx),
            Err(error) => {
                eprintln!("Error: {error}");
                exit_codes::exit_code_for_config_error(&error)
            }
        },
        cli::ConfigCommands::Set(args) => {
            let changes = SettingsUpdate {
                origin: args.origin,
                default_expiry_hours: args.default_expiry_hours,
                max_password_attempts: args.max_password_attempts,
            };
            match config::update(changes) {
                Ok(settings) => print_settings("config-set", &settings, ctx),
                Err(error) => {
                    eprintln!("Error: {error}");
                    exit_codes::exit_code_for_config_error(&error)
                }
            }
        }
    }
}

fn print_settings(kind: &str, settings: &Settings, ctx: &AppContext) -> ExitCode {
    let text = format!(
        "origin = {}\ndefault_expiry_hours = {}\nmax_password_attempts = {}",
        settings.origin, settings.default_expiry_hours, settings.max_password_attempts
    );
    output::print_value(
        text,
        json!({
            "kind": kind,
            "settings": {
                "origin": settings.origin.as_str(),
                "default_expiry_hours": settings.default_expiry_hours,
                "max_password_attempts": settings.max_password_attempts,
            },
        }),
        &ctx.output_mode,
        false,
    )
}
