//! Wire format of a sealed note.
//!
//! A payload is serialized as camelCase JSON and the JSON bytes are then
//! base64-encoded with the URL-safe alphabet (no padding), so the token can
//! be dropped into a URL fragment without escaping. Decoding is a pure data
//! transformation and also accepts the standard alphabet and padded input,
//! which is what older links carry.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cipher::NONCE_LEN;
use super::kdf::SALT_LEN;

const TOKEN_ENCODE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const TOKEN_DECODE_LEGACY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("note token is empty")]
    Empty,

    #[error("note token is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("note payload is not valid UTF-8")]
    Utf8,

    #[error("note payload is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that travels inside a share URL.
///
/// Only `cipher` is confidential; the remaining fields are readable by anyone
/// holding the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub title: String,
    #[serde(with = "bytes_as_base64")]
    pub cipher: Vec<u8>,
    pub iv: [u8; NONCE_LEN],
    pub salt: [u8; SALT_LEN],
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// `None` means the note never expires.
    pub expires_at: Option<u64>,
    pub self_destruct: bool,
    pub email_notify: Option<String>,
}

impl NotePayload {
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(expires_at) if now_ms > expires_at)
    }
}

pub fn encode(payload: &NotePayload) -> Result<String, CodecError> {
    let json = serde_json::to_vec(payload)?;
    Ok(TOKEN_ENCODE.encode(json))
}

pub fn decode(token: &str) -> Result<NotePayload, CodecError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CodecError::Empty);
    }

    let bytes = match TOKEN_ENCODE.decode(token) {
        Ok(bytes) => bytes,
        Err(_) => TOKEN_DECODE_LEGACY.decode(token)?,
    };
    let json = std::str::from_utf8(&bytes).map_err(|_| CodecError::Utf8)?;
    Ok(serde_json::from_str(json)?)
}

mod bytes_as_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> NotePayload {
        NotePayload {
            title: "Note A".to_string(),
            cipher: vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0xff],
            iv: [1u8; NONCE_LEN],
            salt: [2u8; SALT_LEN],
            created_at: 1_700_000_000_000,
            expires_at: Some(1_700_003_600_000),
            self_destruct: true,
            email_notify: None,
        }
    }

    fn legacy_token(value: &serde_json::Value) -> String {
        base64::engine::general_purpose::STANDARD.encode(value.to_string())
    }

    #[test]
    fn token_is_url_safe() {
        let token = encode(&sample()).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn json_uses_camel_case_and_byte_arrays() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["createdAt"], json!(1_700_000_000_000u64));
        assert_eq!(value["selfDestruct"], json!(true));
        assert_eq!(value["emailNotify"], serde_json::Value::Null);
        assert_eq!(value["cipher"], json!("3q2+7wD/"));
        assert_eq!(value["iv"].as_array().unwrap().len(), NONCE_LEN);
        assert_eq!(value["salt"].as_array().unwrap().len(), SALT_LEN);
    }

    #[test]
    fn decodes_standard_alphabet_tokens() {
        let value = json!({
            "title": "Legacy",
            "cipher": "3q2+7wD/",
            "iv": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            "salt": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            "createdAt": 1,
            "expiresAt": null,
            "selfDestruct": false,
            "emailNotify": "a@example.com",
        });

        let payload = decode(&legacy_token(&value)).unwrap();
        assert_eq!(payload.title, "Legacy");
        assert_eq!(payload.cipher, vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0xff]);
        assert_eq!(payload.iv[11], 11);
        assert_eq!(payload.expires_at, None);
        assert_eq!(payload.email_notify.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(decode("  ").unwrap_err(), CodecError::Empty));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(decode("not base64!!").unwrap_err(), CodecError::Base64(_)));
    }

    #[test]
    fn non_json_token_is_rejected() {
        let token = TOKEN_ENCODE.encode(b"hello world");
        assert!(matches!(decode(&token).unwrap_err(), CodecError::Json(_)));
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("salt");
        assert!(matches!(decode(&legacy_token(&value)).unwrap_err(), CodecError::Json(_)));
    }

    #[test]
    fn wrong_iv_length_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["iv"] = json!([1, 2, 3]);
        assert!(matches!(decode(&legacy_token(&value)).unwrap_err(), CodecError::Json(_)));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["selfDestruct"] = json!("yes");
        assert!(matches!(decode(&legacy_token(&value)).unwrap_err(), CodecError::Json(_)));
    }

    #[test]
    fn invalid_inner_base64_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["cipher"] = json!("***");
        assert!(matches!(decode(&legacy_token(&value)).unwrap_err(), CodecError::Json(_)));
    }

    #[test]
    fn expiry_is_strictly_after_expires_at() {
        let payload = sample();
        let t = payload.expires_at.unwrap();
        assert!(!payload.is_expired_at(t - 1));
        assert!(!payload.is_expired_at(t));
        assert!(payload.is_expired_at(t + 1));

        let permanent = NotePayload {
            expires_at: None,
            ..sample()
        };
        assert!(!permanent.is_expired_at(u64::MAX));
    }

    fn arb_payload() -> impl Strategy<Value = NotePayload> {
        (
            ".*",
            proptest::collection::vec(any::<u8>(), 0..128),
            any::<[u8; NONCE_LEN]>(),
            any::<[u8; SALT_LEN]>(),
            any::<u64>(),
            proptest::option::of(any::<u64>()),
            any::<bool>(),
            proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
        )
            .prop_map(
                |(title, cipher, iv, salt, created_at, expires_at, self_destruct, email_notify)| {
                    NotePayload {
                        title,
                        cipher,
                        iv,
                        salt,
                        created_at,
                        expires_at,
                        self_destruct,
                        email_notify,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(payload in arb_payload()) {
            let token = encode(&payload).unwrap();
            prop_assert_eq!(decode(&token).unwrap(), payload);
        }
    }
}
