use crate::app::AppContext;
use crate::note::{self, SealRequest, SystemClock};
use crate::strength::{self, StrengthLevel};
use crate::{cli, config, exit_codes, output, prompt, sanitize, store};
use secrecy::ExposeSecret;
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;
use tracing::warn;

struct Source {
    content: String,
    title: Option<String>,
    doc_id: Option<String>,
}

pub fn run(args: cli::SealArgs, ctx: &AppContext) -> ExitCode {
    let settings = match super::load_settings() {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    let base_url = match args.origin.clone() {
        Some(origin) => {
            if let Err(error) = config::validate_origin(&origin) {
                eprintln!("Error: {error}");
                return exit_codes::exit_code_for_config_error(&error);
            }
            origin
        }
        None => settings.origin,
    };

    let data_dir = match super::resolve_data_dir(ctx) {
        Ok(dir) => dir,
        Err(code) => return code,
    };

    let source = match read_source(&args, &data_dir) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let (password, confirm_password) = match prompt::prompt_seal_passwords() {
        Ok(passwords) => passwords,
        Err(error) => {
            eprintln!("Error: failed to read password: {error}");
            return exit_codes::exit_code_for_io_error(&error);
        }
    };

    if !password.expose_secret().is_empty() {
        let report = strength::assess(password.expose_secret());
        if report.level == StrengthLevel::Weak {
            warn!(
                score = report.score,
                level = report.level.as_str(),
                length = report.length,
                bits = report.shannon_bits_estimate,
                "weak note password"
            );
            if !ctx.output_mode.quiet {
                eprintln!(
                    "Warning: weak password (score {}/5); anyone who guesses it can read the note",
                    report.score
                );
            }
        }
    }

    let request = SealRequest {
        content: sanitize::strip_scripts(&source.content),
        password,
        confirm_password,
        title: args.title.or(source.title).unwrap_or_default(),
        expiry_hours: args.expiry_hours.unwrap_or(settings.default_expiry_hours),
        self_destruct: args.self_destruct,
        notify: args.notify || args.notify_email.is_some(),
        notify_email: args.notify_email,
        base_url,
        doc_id: source.doc_id,
    };

    let sealed = match note::create(request, &SystemClock) {
        Ok(sealed) => sealed,
        Err(error) => {
            eprintln!("Error: {error}");
            return exit_codes::exit_code_for_protocol_error(&error);
        }
    };

    // The link is already usable; losing the history entry is not fatal.
    let links = store::ShareRecordStore::new(store::links_storage(&data_dir));
    if let Err(error) = links.append(sealed.record.clone()) {
        warn!(%error, "failed to record share link");
        eprintln!("Warning: share link was not recorded: {error}");
    }

    if !ctx.output_mode.quiet && !ctx.output_mode.json {
        eprintln!(
            "{}",
            output::note::seal_summary(sealed.payload.expires_at, sealed.payload.self_destruct)
        );
    }

    output::print_value(
        sealed.url.clone(),
        json!({
            "kind": "seal",
            "record_id": sealed.record.id.as_str(),
            "doc_id": sealed.record.doc_id.as_deref(),
            "title": sealed.payload.title.as_str(),
            "created_at": sealed.payload.created_at,
            "expires_at": sealed.payload.expires_at,
            "self_destruct": sealed.payload.self_destruct,
            "notify_on_destroy": sealed.payload.email_notify.is_some(),
            "state": sealed.state.as_str(),
        }),
        &ctx.output_mode,
        ctx.copy_requested,
    )
}

fn read_source(args: &cli::SealArgs, data_dir: &Path) -> Result<Source, ExitCode> {
    if let Some(id) = &args.doc {
        let docs = store::DocumentStore::new(store::documents_storage(data_dir));
        return match docs.get(id) {
            Ok(doc) => Ok(Source {
                content: doc.content,
                title: Some(doc.title),
                doc_id: Some(doc.id),
            }),
            Err(error) => {
                eprintln!("Error: {error}");
                Err(exit_codes::exit_code_for_store_error(&error))
            }
        };
    }

    if let Some(path) = &args.file {
        return match std::fs::read_to_string(path) {
            Ok(content) => Ok(Source {
                content,
                title: store::docs::title_from_file_name(path),
                doc_id: None,
            }),
            Err(error) => {
                eprintln!("Error: failed to read {}: {error}", path.display());
                Err(exit_codes::exit_code_for_io_error(&error))
            }
        };
    }

    Ok(Source {
        content: args.content.clone().unwrap_or_default(),
        title: None,
        doc_id: None,
    })
}
