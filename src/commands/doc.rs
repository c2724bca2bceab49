use crate::app::AppContext;
use crate::note::{Clock, SystemClock};
use crate::output::note::{document_json, document_summary_json, document_summary_text};
use crate::store::{DocumentStore, FileStorage};
use crate::{cli, exit_codes, output, sanitize, store};
use serde_json::json;
use std::io::Read;
use std::process::ExitCode;

pub fn run(args: cli::DocArgs, ctx: &AppContext) -> ExitCode {
    let docs = match super::resolve_data_dir(ctx) {
        Ok(dir) => DocumentStore::new(store::documents_storage(&dir)),
        Err(code) => return code,
    };

    match args.command {
        cli::DocCommands::New(args) => new(args, &docs, ctx),
        cli::DocCommands::List => match docs.list() {
            Ok(list) => output::print_value(
                list.iter()
                    .map(document_summary_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
                json!({
                    "kind": "doc-list",
                    "count": list.len(),
                    "documents": list.iter().map(document_summary_json).collect::<Vec<_>>(),
                }),
                &ctx.output_mode,
                false,
            ),
            Err(error) => {
                eprintln!("Error: {error}");
                exit_codes::exit_code_for_store_error(&error)
            }
        },
        cli::DocCommands::Show(args) => match docs.get(&args.id) {
            Ok(doc) => {
                if !ctx.output_mode.quiet && !ctx.output_mode.json {
                    eprintln!("{}", doc.title);
                }
                output::print_value(
                    doc.content.clone(),
                    json!({
                        "kind": "doc-show",
                        "document": document_json(&doc),
                    }),
                    &ctx.output_mode,
                    ctx.copy_requested,
                )
            }
            Err(error) => {
                eprintln!("Error: {error}");
                exit_codes::exit_code_for_store_error(&error)
            }
        },
        cli::DocCommands::Edit(args) => {
            if args.title.is_none() && args.content.is_none() {
                eprintln!("Error: nothing to change; pass --title and/or --content");
                return ExitCode::from(exit_codes::EXIT_USAGE);
            }

            let content = args.content.as_deref().map(sanitize::strip_scripts);
            match docs.update(
                &args.id,
                args.title.as_deref(),
                content.as_deref(),
                SystemClock.now_ms(),
            ) {
                Ok(doc) => print_summary("doc-edit", &doc, ctx),
                Err(error) => {
                    eprintln!("Error: {error}");
                    exit_codes::exit_code_for_store_error(&error)
                }
            }
        }
        cli::DocCommands::Rm(args) => match docs.remove(&args.id) {
            Ok(doc) => print_summary("doc-rm", &doc, ctx),
            Err(error) => {
                eprintln!("Error: {error}");
                exit_codes::exit_code_for_store_error(&error)
            }
        },
    }
}

fn new(args: cli::DocNewArgs, docs: &DocumentStore<FileStorage>, ctx: &AppContext) -> ExitCode {
    let (content, file_title) = if let Some(content) = args.content {
        (content, None)
    } else if let Some(path) = &args.file {
        match std::fs::read_to_string(path) {
            Ok(content) => (content, store::docs::title_from_file_name(path)),
            Err(error) => {
                eprintln!("Error: failed to read {}: {error}", path.display());
                return exit_codes::exit_code_for_io_error(&error);
            }
        }
    } else {
        let mut content = String::new();
        if let Err(error) = std::io::stdin().read_to_string(&mut content) {
            eprintln!("Error: failed to read stdin: {error}");
            return exit_codes::exit_code_for_io_error(&error);
        }
        (content, None)
    };

    let title = args.title.or(file_title);
    match docs.create(
        title.as_deref(),
        &sanitize::strip_scripts(&content),
        SystemClock.now_ms(),
    ) {
        Ok(doc) => print_summary("doc-new", &doc, ctx),
        Err(error) => {
            eprintln!("Error: {error}");
            exit_codes::exit_code_for_store_error(&error)
        }
    }
}

fn print_summary(kind: &str, doc: &store::Document, ctx: &AppContext) -> ExitCode {
    output::print_value(
        doc.id.clone(),
        json!({
            "kind": kind,
            "document": document_summary_json(doc),
        }),
        &ctx.output_mode,
        false,
    )
}
