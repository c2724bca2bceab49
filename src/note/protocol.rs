//! Sealing and opening of self-contained secure notes.
//!
//! Lifecycle of a single note: `Draft -> Sealed -> {Consumed, Expired}` and
//! `Consumed -> Destroyed` for self-destructing notes.
//!
//! Limitations that callers must surface rather than paper over:
//!
//! - Expiry is checked against the consumer's wall clock. Nothing in the
//!   ciphertext enforces it, so a consumer with a forged clock can read an
//!   expired note.
//! - Self-destruct is a single-viewer convention. The viewer is told to strip
//!   the token from its URL after reading, but anyone who kept a copy of the
//!   link can open it again until it expires.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::cipher::{self, CipherError, NONCE_LEN};
use super::codec::{self, CodecError, NotePayload};
use super::kdf::{self, SALT_LEN};
use super::link;

pub const DEFAULT_TITLE: &str = "Untitled Secure Note";
pub const PASSWORD_PROMPT: &str = "Enter password to unlock this note: ";
pub const RETRY_PROMPT: &str = "Incorrect password, try again: ";

const MS_PER_HOUR: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Draft,
    Sealed,
    Consumed,
    Expired,
    Destroyed,
}

impl NoteState {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteState::Draft => "draft",
            NoteState::Sealed => "sealed",
            NoteState::Consumed => "consumed",
            NoteState::Expired => "expired",
            NoteState::Destroyed => "destroyed",
        }
    }

    fn transition(self, next: NoteState) -> Result<NoteState, ProtocolError> {
        use NoteState::*;

        match (self, next) {
            (Draft, Sealed) | (Sealed, Consumed) | (Sealed, Expired) | (Consumed, Destroyed) => {
                info!(from = self.as_str(), to = next.as_str(), "note state transition");
                Ok(next)
            }
            _ => Err(ProtocolError::IllegalTransition {
                from: self,
                to: next,
            }),
        }
    }
}

impl fmt::Display for NoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("password required")]
    EmptyPassword,

    #[error("passwords don't match")]
    PasswordMismatch,

    #[error("email required for notifications")]
    MissingNotifyEmail,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid note: {0}")]
    MalformedPayload(#[from] CodecError),

    #[error("failed to encode note payload")]
    Encode(#[source] CodecError),

    #[error("this secure note has expired")]
    Expired { expires_at: u64 },

    /// Deliberately does not say which of the two it was.
    #[error("invalid note or incorrect password")]
    WrongPasswordOrCorrupt,

    #[error("platform cryptography unavailable")]
    PlatformCryptoUnavailable,

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("illegal note state transition from {from} to {to}")]
    IllegalTransition { from: NoteState, to: NoteState },
}

impl From<CipherError> for ProtocolError {
    fn from(error: CipherError) -> Self {
        match error {
            CipherError::Authentication => ProtocolError::WrongPasswordOrCorrupt,
            CipherError::RngUnavailable | CipherError::Unavailable => {
                ProtocolError::PlatformCryptoUnavailable
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read password: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Supplies the password when a note is opened.
///
/// `Ok(None)` (or an empty password) means the user dismissed the prompt.
pub trait PasswordProvider {
    fn prompt(&mut self, message: &str) -> Result<Option<SecretString>, PromptError>;
}

impl<F> PasswordProvider for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt(&mut self, message: &str) -> Result<Option<SecretString>, PromptError> {
        Ok(self(message)
            .filter(|pw| !pw.is_empty())
            .map(|pw| SecretString::new(pw.into_boxed_str())))
    }
}

/// Told about self-destructed notes that asked for a notification.
pub trait Notifier {
    fn notify_destroyed(&self, email: &str, title: &str);
}

/// Placeholder delivery: records the request in the log and nothing else.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_destroyed(&self, email: &str, title: &str) {
        info!(email, title, "would send self-destruct notification");
    }
}

/// Creator-side bookkeeping for a sealed note. Never holds key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub id: String,
    pub doc_id: Option<String>,
    pub url: String,
    pub created_at: u64,
    pub expires_at: Option<u64>,
    pub self_destruct: bool,
}

pub struct SealRequest {
    /// Already-sanitized HTML.
    pub content: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub title: String,
    /// `0` means the note never expires.
    pub expiry_hours: u32,
    pub self_destruct: bool,
    pub notify: bool,
    pub notify_email: Option<String>,
    /// Origin and path the `#note=` fragment is appended to.
    pub base_url: String,
    pub doc_id: Option<String>,
}

#[derive(Debug)]
pub struct SealedNote {
    pub url: String,
    pub token: String,
    pub payload: NotePayload,
    pub record: ShareRecord,
    pub state: NoteState,
}

/// What the viewer must do after reading a self-destructing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyAction {
    /// The original URL with the token removed.
    pub stripped_url: String,
    pub notify_email: Option<String>,
}

#[derive(Debug)]
pub struct OpenedNote {
    pub title: String,
    /// Decrypted HTML. Callers sanitize again before display.
    pub content: Zeroizing<String>,
    pub created_at: u64,
    pub expires_at: Option<u64>,
    pub state: NoteState,
    pub destroy: Option<DestroyAction>,
}

#[derive(Debug)]
pub enum Consumption {
    /// The URL carries no `note=` fragment.
    NotSecureNote,
    /// The password prompt was dismissed. Nothing happened.
    Cancelled,
    Opened(OpenedNote),
}

/// A decoded, unexpired note waiting for its password.
///
/// Failed unlock attempts leave it sealed, so it can be retried. A successful
/// unlock moves it on for good: unlocking it again is an illegal transition.
#[derive(Debug)]
pub struct Envelope {
    url: String,
    payload: NotePayload,
    state: NoteState,
}

impl Envelope {
    fn ensure_unexpired(&mut self, clock: &dyn Clock) -> Result<(), ProtocolError> {
        match self.payload.expires_at {
            Some(expires_at) if self.payload.is_expired_at(clock.now_ms()) => {
                self.state = self.state.transition(NoteState::Expired)?;
                Err(ProtocolError::Expired { expires_at })
            }
            _ => Ok(()),
        }
    }

    pub fn unlock(&mut self, password: &SecretString) -> Result<OpenedNote, ProtocolError> {
        if self.state != NoteState::Sealed {
            return Err(ProtocolError::IllegalTransition {
                from: self.state,
                to: NoteState::Consumed,
            });
        }

        let key = kdf::derive_key(password, &self.payload.salt);
        let plaintext = cipher::decrypt(&key, &self.payload.iv, &self.payload.cipher)?;
        let content = String::from_utf8(plaintext.to_vec())
            .map_err(|_| ProtocolError::WrongPasswordOrCorrupt)?;

        let mut state = self.state.transition(NoteState::Consumed)?;
        let destroy = if self.payload.self_destruct {
            state = state.transition(NoteState::Destroyed)?;
            Some(DestroyAction {
                stripped_url: link::strip_fragment(&self.url).to_string(),
                notify_email: self.payload.email_notify.clone(),
            })
        } else {
            None
        };
        self.state = state;

        Ok(OpenedNote {
            title: self.payload.title.clone(),
            content: Zeroizing::new(content),
            created_at: self.payload.created_at,
            expires_at: self.payload.expires_at,
            state,
            destroy,
        })
    }
}

/// Seal `request.content` under the password and build its share URL.
///
/// Nothing is returned until key derivation and encryption have completed.
pub fn create(request: SealRequest, clock: &dyn Clock) -> Result<SealedNote, ProtocolError> {
    validate(&request)?;
    let state = NoteState::Draft;

    let salt = cipher::random_bytes::<SALT_LEN>()?;
    let iv = cipher::random_bytes::<NONCE_LEN>()?;
    let ciphertext = {
        let key = kdf::derive_key(&request.password, &salt);
        cipher::encrypt(&key, &iv, request.content.as_bytes())?
    };
    debug!(len = ciphertext.len(), "note content encrypted");

    let created_at = clock.now_ms();
    let expires_at = expiry_for(created_at, request.expiry_hours);
    let title = if request.title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        request.title
    };

    let payload = NotePayload {
        title,
        cipher: ciphertext,
        iv,
        salt,
        created_at,
        expires_at,
        self_destruct: request.self_destruct,
        email_notify: if request.notify {
            request.notify_email
        } else {
            None
        },
    };

    let token = codec::encode(&payload).map_err(ProtocolError::Encode)?;
    let url = link::share_url(&request.base_url, &token);
    let state = state.transition(NoteState::Sealed)?;

    let record = ShareRecord {
        id: Uuid::new_v4().to_string(),
        doc_id: request.doc_id,
        url: url.clone(),
        created_at,
        expires_at,
        self_destruct: payload.self_destruct,
    };

    Ok(SealedNote {
        url,
        token,
        payload,
        record,
        state,
    })
}

fn validate(request: &SealRequest) -> Result<(), ValidationError> {
    let password = request.password.expose_secret();
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password != request.confirm_password.expose_secret() {
        return Err(ValidationError::PasswordMismatch);
    }
    let has_email = request
        .notify_email
        .as_deref()
        .is_some_and(|email| !email.trim().is_empty());
    if request.notify && !has_email {
        return Err(ValidationError::MissingNotifyEmail);
    }
    Ok(())
}

fn expiry_for(created_at: u64, expiry_hours: u32) -> Option<u64> {
    if expiry_hours == 0 {
        return None;
    }
    Some(created_at.saturating_add(u64::from(expiry_hours) * MS_PER_HOUR))
}

/// Decode a note URL without any expiry policy or decryption.
pub fn inspect(url: &str) -> Result<Option<NotePayload>, ProtocolError> {
    match link::extract_token(url) {
        Some(token) => Ok(Some(codec::decode(&token)?)),
        None => Ok(None),
    }
}

/// Parse `url` and apply the expiry policy.
///
/// `Ok(None)` means the URL is not a secure-note URL. An expired note fails
/// before its ciphertext is looked at.
pub fn open(url: &str, clock: &dyn Clock) -> Result<Option<Envelope>, ProtocolError> {
    let Some(token) = link::extract_token(url) else {
        return Ok(None);
    };

    let payload = codec::decode(&token)?;
    debug!(self_destruct = payload.self_destruct, "note payload decoded");

    let mut envelope = Envelope {
        url: url.to_string(),
        payload,
        state: NoteState::Sealed,
    };
    envelope.ensure_unexpired(clock)?;
    Ok(Some(envelope))
}

/// Open a note with a single password attempt.
pub fn consume(
    url: &str,
    passwords: &mut dyn PasswordProvider,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
) -> Result<Consumption, ProtocolError> {
    consume_with_retries(url, passwords, notifier, clock, 1)
}

/// Open a note, re-prompting after a wrong password up to `max_attempts`.
pub fn consume_with_retries(
    url: &str,
    passwords: &mut dyn PasswordProvider,
    notifier: &dyn Notifier,
    clock: &dyn Clock,
    max_attempts: u32,
) -> Result<Consumption, ProtocolError> {
    let Some(mut envelope) = open(url, clock)? else {
        return Ok(Consumption::NotSecureNote);
    };

    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        if attempt > 1 {
            envelope.ensure_unexpired(clock)?;
        }

        let message = if attempt == 1 {
            PASSWORD_PROMPT
        } else {
            RETRY_PROMPT
        };
        let password = match passwords.prompt(message)? {
            Some(pw) if !pw.expose_secret().is_empty() => pw,
            _ => {
                debug!("password prompt dismissed");
                return Ok(Consumption::Cancelled);
            }
        };

        match envelope.unlock(&password) {
            Ok(note) => {
                if let Some(DestroyAction {
                    notify_email: Some(email),
                    ..
                }) = &note.destroy
                {
                    notifier.notify_destroyed(email, &note.title);
                }
                return Ok(Consumption::Opened(note));
            }
            Err(ProtocolError::WrongPasswordOrCorrupt) if attempt < max_attempts => {
                warn!(attempt, max_attempts, "note unlock failed");
            }
            Err(error) => return Err(error),
        }
    }

    Err(ProtocolError::WrongPasswordOrCorrupt)
}
