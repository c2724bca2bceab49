pub mod cipher;
pub mod codec;
pub mod kdf;
pub mod link;
pub mod protocol;

pub use codec::NotePayload;
pub use protocol::{
    Clock, Consumption, LogNotifier, PasswordProvider, PromptError, ProtocolError, SealRequest,
    ShareRecord, SystemClock, consume_with_retries, create, inspect,
};
