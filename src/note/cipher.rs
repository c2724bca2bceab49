//! Authenticated encryption of note content.
//!
//! AES-256-GCM with a 96-bit nonce; the 16-byte tag is appended to the
//! ciphertext. Every seal derives a fresh key from a fresh salt, so a
//! `(key, nonce)` pair is never reused as long as the OS RNG is sound.
//!
//! Do not log keys, nonces paired with keys, or plaintext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::Zeroizing;

use super::kdf::DerivedKey;

/// Size (bytes) of AES-GCM nonces.
pub const NONCE_LEN: usize = 12;
/// Size (bytes) of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CipherError {
    /// Tag did not verify: wrong key, wrong nonce, or modified ciphertext.
    #[error("authentication failed")]
    Authentication,

    #[error("operating system random number generator unavailable")]
    RngUnavailable,

    #[error("cipher unavailable")]
    Unavailable,
}

/// Generate `N` cryptographically-secure random bytes.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CipherError> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| CipherError::RngUnavailable)?;
    Ok(bytes)
}

pub fn encrypt(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::Unavailable)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CipherError::Unavailable)
}

/// Returns `CipherError::Authentication` for any tag mismatch.
pub fn decrypt(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::Unavailable)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::Authentication)?;
    Ok(Zeroizing::new(plaintext))
}
