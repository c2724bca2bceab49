//! Local document collection, keyed by document id.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Storage, StoreError, load_or_default, modify};

pub const UNTITLED: &str = "Untitled";
const DERIVED_TITLE_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created: u64,
    pub updated: u64,
}

type Documents = BTreeMap<String, Document>;

pub struct DocumentStore<S> {
    storage: S,
}

impl<S: Storage> DocumentStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<Documents, StoreError> {
        load_or_default(&self.storage)
    }

    /// `title` falls back to one derived from the content.
    pub fn create(
        &self,
        title: Option<&str>,
        content: &str,
        now: u64,
    ) -> Result<Document, StoreError> {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            title: resolve_title(title, content),
            content: content.to_string(),
            created: now,
            updated: now,
        };
        debug!(id = %doc.id, "creating document");
        modify(&self.storage, |docs: &mut Documents| {
            docs.insert(doc.id.clone(), doc.clone());
            Ok(())
        })?;
        Ok(doc)
    }

    /// Keep a local copy of a note that was opened from a link.
    pub fn save_copy(&self, title: &str, content: &str, now: u64) -> Result<Document, StoreError> {
        self.create(Some(&format!("{title} (Copy)")), content, now)
    }

    pub fn get(&self, id: &str) -> Result<Document, StoreError> {
        self.load()?
            .remove(id)
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))
    }

    /// Most recently updated first.
    pub fn list(&self) -> Result<Vec<Document>, StoreError> {
        let mut docs: Vec<_> = self.load()?.into_values().collect();
        docs.sort_by(|a, b| b.updated.cmp(&a.updated));
        Ok(docs)
    }

    /// `None` leaves a field unchanged; a blank title is re-derived from the
    /// (possibly new) content.
    pub fn update(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
        now: u64,
    ) -> Result<Document, StoreError> {
        modify(&self.storage, |docs: &mut Documents| {
            let doc = docs
                .get_mut(id)
                .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;

            if let Some(content) = content {
                doc.content = content.to_string();
            }
            if let Some(title) = title {
                doc.title = resolve_title(Some(title), &doc.content);
            }
            doc.updated = now;
            Ok(doc.clone())
        })
    }

    pub fn remove(&self, id: &str) -> Result<Document, StoreError> {
        modify(&self.storage, |docs: &mut Documents| {
            docs.remove(id)
                .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))
        })
    }
}

fn resolve_title(title: Option<&str>, content: &str) -> String {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => {
            let derived = derive_title(content);
            if derived.is_empty() {
                UNTITLED.to_string()
            } else {
                derived
            }
        }
    }
}

/// First line of the text content, tags removed, capped at 60 characters.
pub fn derive_title(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.trim()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(DERIVED_TITLE_MAX_CHARS)
        .collect()
}

/// File name without its extension, used as the title of imported files.
pub fn title_from_file_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.trim().is_empty())
}
