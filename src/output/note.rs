use chrono::{DateTime, Local, Utc};
use serde_json::json;

use crate::note::{NotePayload, ShareRecord};
use crate::store::Document;

const MS_PER_MINUTE: u64 = 60 * 1000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

pub fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Time left before `expires_at`, as `"{d}d {h}h {m}m"`, or `"Expired"`.
pub fn countdown(expires_at: u64, now: u64) -> String {
    if now > expires_at {
        return "Expired".to_string();
    }
    let diff = expires_at - now;
    format!(
        "{}d {}h {}m",
        diff / MS_PER_DAY,
        (diff % MS_PER_DAY) / MS_PER_HOUR,
        (diff % MS_PER_HOUR) / MS_PER_MINUTE
    )
}

/// One-line summary shown after sealing, e.g.
/// `Expires: 2024-01-01 10:00 · Self-destruct enabled`.
pub fn seal_summary(expires_at: Option<u64>, self_destruct: bool) -> String {
    let expires = expires_at.map_or_else(|| "Never".to_string(), format_timestamp);
    let mode = if self_destruct {
        "Self-destruct enabled"
    } else {
        "Permanent"
    };
    format!("Expires: {expires} · {mode}")
}

pub fn payload_text(payload: &NotePayload, now: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("title:\t{}\n", payload.title));
    out.push_str(&format!("created_at:\t{}\n", format_timestamp(payload.created_at)));
    match payload.expires_at {
        Some(expires_at) => {
            out.push_str(&format!("expires_at:\t{}\n", format_timestamp(expires_at)));
            out.push_str(&format!("remaining:\t{}\n", countdown(expires_at, now)));
        }
        None => out.push_str("expires_at:\tnever\n"),
    }
    out.push_str(&format!("self_destruct:\t{}\n", payload.self_destruct));
    out.push_str(&format!(
        "notify_on_destroy:\t{}\n",
        payload.email_notify.is_some()
    ));
    out.push_str(&format!("ciphertext_bytes:\t{}", payload.cipher.len()));
    out
}

pub fn payload_json(payload: &NotePayload, now: u64) -> serde_json::Value {
    json!({
        "title": payload.title.as_str(),
        "created_at": payload.created_at,
        "expires_at": payload.expires_at,
        "expired": payload.is_expired_at(now),
        "remaining": payload.expires_at.map(|e| countdown(e, now)),
        "self_destruct": payload.self_destruct,
        "notify_on_destroy": payload.email_notify.is_some(),
        "ciphertext_bytes": payload.cipher.len(),
    })
}

pub fn record_summary_text(record: &ShareRecord, now: u64) -> String {
    let expiry = match record.expires_at {
        Some(expires_at) => countdown(expires_at, now),
        None => "never".to_string(),
    };
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.id,
        format_timestamp(record.created_at),
        expiry,
        if record.self_destruct {
            "self-destruct"
        } else {
            "permanent"
        },
        record.url
    )
}

pub fn record_json(record: &ShareRecord, now: u64) -> serde_json::Value {
    json!({
        "id": record.id.as_str(),
        "doc_id": record.doc_id.as_deref(),
        "url": record.url.as_str(),
        "created_at": record.created_at,
        "expires_at": record.expires_at,
        "expired": record.expires_at.is_some_and(|e| now > e),
        "self_destruct": record.self_destruct,
    })
}

pub fn document_summary_text(doc: &Document) -> String {
    format!("{}\t{}\t{}", doc.id, format_timestamp(doc.updated), doc.title)
}

pub fn document_summary_json(doc: &Document) -> serde_json::Value {
    json!({
        "id": doc.id.as_str(),
        "title": doc.title.as_str(),
        "created": doc.created,
        "updated": doc.updated,
    })
}

pub fn document_json(doc: &Document) -> serde_json::Value {
    json!({
        "id": doc.id.as_str(),
        "title": doc.title.as_str(),
        "content": doc.content.as_str(),
        "created": doc.created,
        "updated": doc.updated,
    })
}
