use crate::app::AppContext;
use crate::note::{self, Clock, SystemClock};
use crate::{cli, exit_codes, output};
use serde_json::json;
use std::process::ExitCode;

pub fn run(args: cli::InspectArgs, ctx: &AppContext) -> ExitCode {
    let payload = match note::inspect(&args.url) {
        Ok(Some(payload)) => payload,
        Ok(None) => return super::not_a_note_link(&args.url),
        Err(error) => {
            eprintln!("Error: {error}");
            return exit_codes::exit_code_for_protocol_error(&error);
        }
    };

    let now = SystemClock.now_ms();
    output::print_value(
        output::note::payload_text(&payload, now),
        json!({
            "kind": "inspect",
            "note": output::note::payload_json(&payload, now),
        }),
        &ctx.output_mode,
        false,
    )
}
