use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Default)]
struct TrayInner {
    next_id: u64,
    visible: Vec<Toast>,
}

/// On-screen toasts. Each toast removes itself after its delay; needs a
/// running tokio runtime.
#[derive(Clone, Default)]
pub struct ToastTray {
    inner: Arc<Mutex<TrayInner>>,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>, ttl: Duration) -> u64 {
        let id = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.next_id += 1;
            let id = inner.next_id;
            inner.visible.push(Toast {
                id,
                kind,
                message: message.into(),
            });
            id
        };
        debug!(id, ?kind, ttl_ms = ttl.as_millis() as u64, "toast shown");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.visible.retain(|t| t.id != id);
        });
        id
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .visible
            .clone()
    }
}
