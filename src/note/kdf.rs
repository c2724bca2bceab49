//! Password-based key derivation for sealed notes.
//!
//! The parameters are fixed and are not carried in the payload: the creator
//! and every consumer must agree on them, so changing any constant here makes
//! all previously shared links unreadable.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroizing;

/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Size (bytes) of the per-note salt.
pub const SALT_LEN: usize = 16;
/// Size (bytes) of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Symmetric key material scoped to a single seal or unlock call.
///
/// The bytes are wiped when the key is dropped and the type is deliberately
/// neither `Clone` nor serializable.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the note key from a password and salt.
pub fn derive_key(password: &SecretString, salt: &[u8; SALT_LEN]) -> DerivedKey {
    derive_key_from_bytes(password.expose_secret().as_bytes(), salt)
}

fn derive_key_from_bytes(password: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key[..]);
    DerivedKey(key)
}
