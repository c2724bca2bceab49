use crate::app::AppContext;
use crate::note::{Clock, SystemClock};
use crate::{cli, exit_codes, output, store};
use serde_json::json;
use std::process::ExitCode;
use tracing::debug;

pub fn run(args: cli::LinksArgs, ctx: &AppContext) -> ExitCode {
    match args.command {
        cli::LinksCommands::List => {
            let data_dir = match super::resolve_data_dir(ctx) {
                Ok(dir) => dir,
                Err(code) => return code,
            };

            let storage = store::links_storage(&data_dir);
            debug!(path = %storage.path().display(), "listing share records");
            let links = store::ShareRecordStore::new(storage);
            let records = match links.list() {
                Ok(records) => records,
                Err(error) => {
                    eprintln!("Error: {error}");
                    return exit_codes::exit_code_for_store_error(&error);
                }
            };

            let now = SystemClock.now_ms();
            let text = records
                .iter()
                .map(|record| output::note::record_summary_text(record, now))
                .collect::<Vec<_>>()
                .join("\n");
            let records_json = records
                .iter()
                .map(|record| output::note::record_json(record, now))
                .collect::<Vec<_>>();

            output::print_value(
                text,
                json!({
                    "kind": "links-list",
                    "count": records.len(),
                    "records": records_json,
                }),
                &ctx.output_mode,
                false,
            )
        }
    }
}
