use crate::{config, note, store};
use std::process::ExitCode;

pub const EXIT_USAGE: u8 = 64;
pub const EXIT_IO: u8 = 2;
pub const EXIT_SOFTWARE: u8 = 1;

pub fn exit_code_for_config_error(error: &config::ConfigError) -> ExitCode {
    use config::ConfigError::*;

    match error {
        ConfigDirUnavailable | Io(_) => ExitCode::from(EXIT_IO),
        InvalidOrigin(_) | InvalidAttempts(_) => ExitCode::from(EXIT_USAGE),
        Parse(_) | Serialize(_) => ExitCode::from(EXIT_SOFTWARE),
    }
}

pub fn exit_code_for_protocol_error(error: &note::ProtocolError) -> ExitCode {
    use note::ProtocolError::*;

    match error {
        Validation(_) | MalformedPayload(_) | Expired { .. } | WrongPasswordOrCorrupt => {
            ExitCode::from(EXIT_USAGE)
        }
        PlatformCryptoUnavailable | Prompt(_) => ExitCode::from(EXIT_IO),
        Encode(_) | IllegalTransition { .. } => ExitCode::from(EXIT_SOFTWARE),
    }
}

pub fn exit_code_for_store_error(error: &store::StoreError) -> ExitCode {
    use store::StoreError::*;

    match error {
        DataDirUnavailable | Io(_) => ExitCode::from(EXIT_IO),
        DocumentNotFound(_) => ExitCode::from(EXIT_USAGE),
        Json(_) => ExitCode::from(EXIT_SOFTWARE),
    }
}

pub fn exit_code_for_io_error(_error: &std::io::Error) -> ExitCode {
    ExitCode::from(EXIT_IO)
}
