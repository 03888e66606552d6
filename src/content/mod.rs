pub mod path;
pub mod types;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use types::{Contact, SiteMeta, Source, ToastText};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content document unavailable from {source_ref}")]
    Unavailable {
        source_ref: String,
        #[source]
        cause: anyhow::Error,
    },
}

/// The loaded content document. Built once per page view and handed to every
/// component that reads page text; read-only after construction.
#[derive(Debug, Clone)]
pub struct ContentContext {
    doc: Value,
    meta: SiteMeta,
    toasts: ToastText,
    fallback: bool,
}

impl ContentContext {
    pub fn from_value(doc: Value) -> Self {
        let meta = section(&doc, "meta").unwrap_or_default();
        let toasts = section(&doc, "toasts").unwrap_or_default();
        Self {
            doc,
            meta,
            toasts,
            fallback: false,
        }
    }

    /// Context used when the document could not be fetched or parsed: empty
    /// tree, built-in contact list, template defaults left in place.
    pub fn fallback() -> Self {
        Self {
            doc: Value::Object(Default::default()),
            meta: SiteMeta::default(),
            toasts: ToastText::default(),
            fallback: true,
        }
    }

    /// Fetch the document from an http(s) URL or read it from a local path.
    pub async fn fetch(source: &str, client: &reqwest::Client) -> Result<Self, ContentError> {
        let unavailable = |cause: anyhow::Error| ContentError::Unavailable {
            source_ref: source.to_string(),
            cause,
        };

        let text = if source.starts_with("http://") || source.starts_with("https://") {
            fetch_remote(source, client).await.map_err(unavailable)?
        } else {
            tokio::fs::read_to_string(Path::new(source))
                .await
                .context("Failed to read content file")
                .map_err(unavailable)?
        };

        let doc: Value = serde_json::from_str(&text)
            .context("Failed to parse content JSON")
            .map_err(unavailable)?;
        if !doc.is_object() {
            return Err(unavailable(anyhow::anyhow!("content root is not an object")));
        }

        debug!(source, size = text.len(), "content document fetched");
        Ok(Self::from_value(doc))
    }

    /// Load the document, degrading to [`ContentContext::fallback`] on any failure.
    pub async fn load(source: &str, client: &reqwest::Client) -> Self {
        match Self::fetch(source, client).await {
            Ok(ctx) => {
                info!(source, "Content document loaded");
                ctx
            }
            Err(e) => {
                warn!(error = ?e, "Content unavailable, using fallback page content");
                Self::fallback()
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn meta(&self) -> &SiteMeta {
        &self.meta
    }

    pub fn toasts(&self) -> &ToastText {
        &self.toasts
    }

    pub fn text(&self, path: &str) -> Option<String> {
        path::resolve_text(&self.doc, path)
    }

    /// Contacts from the document. The fallback context yields the built-in
    /// list; a loaded document without a `contacts` array yields nothing.
    pub fn contacts(&self) -> Vec<Contact> {
        if self.fallback {
            return types::fallback_contacts();
        }
        list_items(self.doc.get("contacts"), "contacts")
    }

    pub fn sources(&self) -> Vec<Source> {
        list_items(self.doc.get("sources"), "sources")
    }
}

async fn fetch_remote(url: &str, client: &reqwest::Client) -> anyhow::Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .context("Content request failed")?
        .error_for_status()
        .context("Content request returned an error status")?;
    resp.text().await.context("Failed to read content body")
}

fn section<T: DeserializeOwned>(doc: &Value, key: &str) -> Option<T> {
    let value = doc.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, "Malformed content section ignored: {}", e);
            None
        }
    }
}

/// Decode a homogeneous list leniently: non-arrays are empty, malformed items
/// are skipped, order is preserved.
pub fn list_items<T: DeserializeOwned>(value: Option<&Value>, label: &str) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(list = label, index = i, "Skipping malformed list item: {}", e);
                None
            }
        })
        .collect()
}
