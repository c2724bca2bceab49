use crate::app::AppContext;
use crate::note::{self, Clock, Consumption, LogNotifier, SystemClock};
use crate::{cli, exit_codes, output, prompt, sanitize, store};
use serde_json::json;
use std::process::ExitCode;
use zeroize::Zeroizing;

pub fn run(args: cli::OpenArgs, ctx: &AppContext) -> ExitCode {
    let settings = match super::load_settings() {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    // The title is not encrypted; show it on the lock screen.
    if !ctx.output_mode.quiet && !ctx.output_mode.json {
        if let Ok(Some(payload)) = note::inspect(&args.url) {
            eprintln!("{}", payload.title);
        }
    }

    let mut passwords = prompt::TerminalPrompt;
    let result = note::consume_with_retries(
        &args.url,
        &mut passwords,
        &LogNotifier,
        &SystemClock,
        settings.max_password_attempts,
    );

    let opened = match result {
        Ok(Consumption::Opened(opened)) => opened,
        Ok(Consumption::NotSecureNote) => return super::not_a_note_link(&args.url),
        Ok(Consumption::Cancelled) => {
            if !ctx.output_mode.quiet {
                eprintln!("Cancelled.");
            }
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("Error: {error}");
            return exit_codes::exit_code_for_protocol_error(&error);
        }
    };

    let content = Zeroizing::new(sanitize::strip_scripts(&opened.content));

    let saved_copy = if args.save_copy {
        let data_dir = match super::resolve_data_dir(ctx) {
            Ok(dir) => dir,
            Err(code) => return code,
        };
        let docs = store::DocumentStore::new(store::documents_storage(&data_dir));
        match docs.save_copy(&opened.title, &content, SystemClock.now_ms()) {
            Ok(doc) => Some(doc.id),
            Err(error) => {
                eprintln!("Error: {error}");
                return exit_codes::exit_code_for_store_error(&error);
            }
        }
    } else {
        None
    };

    if !ctx.output_mode.quiet && !ctx.output_mode.json {
        if let Some(id) = &saved_copy {
            eprintln!("Saved a copy as document {id}");
        }
        if let Some(destroy) = &opened.destroy {
            eprintln!("This note has been destroyed. Remove the link from your history:");
            eprintln!("{}", destroy.stripped_url);
        }
    }

    output::print_value(
        content.as_str().to_owned(),
        json!({
            "kind": "open",
            "title": opened.title.as_str(),
            "created_at": opened.created_at,
            "expires_at": opened.expires_at,
            "state": opened.state.as_str(),
            "destroyed": opened.destroy.is_some(),
            "stripped_url": opened.destroy.as_ref().map(|d| d.stripped_url.as_str()),
            "saved_copy": saved_copy,
        }),
        &ctx.output_mode,
        ctx.copy_requested,
    )
}
