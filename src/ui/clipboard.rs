use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::toast::{ToastKind, ToastTray};
use crate::content::types::ToastText;
use crate::state::UiConfig;

pub const COPY_FAILED_MESSAGE: &str = "Couldn't copy automatically. Please select the text and copy it manually.";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard write denied: {0}")]
    Denied(String),
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share sheet unavailable")]
    Unavailable,
    #[error("share cancelled by user")]
    Cancelled,
}

pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// The platform share sheet.
pub trait ShareSheet {
    fn is_available(&self) -> bool;
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}

/// Clipboard for headless runs: keeps the last write and logs it.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        info!(len = text.len(), "Clipboard write");
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

/// No share sheet (desktop browsers, headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _request: &ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    CopiedLink,
    Failed,
}

/// Copy and share actions with toast feedback.
pub struct PageActions<C, S> {
    clipboard: C,
    share_sheet: S,
    toasts: ToastTray,
    text: ToastText,
    ui: UiConfig,
    share: ShareRequest,
}

impl<C: Clipboard, S: ShareSheet> PageActions<C, S> {
    pub fn new(
        clipboard: C,
        share_sheet: S,
        toasts: ToastTray,
        text: ToastText,
        ui: UiConfig,
        share: ShareRequest,
    ) -> Self {
        Self {
            clipboard,
            share_sheet,
            toasts,
            text,
            ui,
            share,
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn toasts(&self) -> &ToastTray {
        &self.toasts
    }

    /// Write to the clipboard and show exactly one toast for the result.
    async fn copy_with_toast(
        &self,
        what: &str,
        text: &str,
        success: &str,
        ttl: std::time::Duration,
    ) -> bool {
        match self.clipboard.write_text(text).await {
            Ok(()) => {
                self.toasts.show(ToastKind::Success, success, ttl);
                true
            }
            Err(e) => {
                warn!(what, error = %e, "Copy failed");
                self.toasts
                    .show(ToastKind::Failure, COPY_FAILED_MESSAGE, self.ui.failure_toast);
                false
            }
        }
    }

    pub async fn copy_email(&self, email: &str) -> bool {
        self.copy_with_toast("email", email, &self.text.email_copied, self.ui.email_toast)
            .await
    }

    pub async fn copy_template(&self, template: &str) -> bool {
        self.copy_with_toast(
            "template",
            template,
            &self.text.template_copied,
            self.ui.template_toast,
        )
        .await
    }

    pub async fn copy_link_fallback(&self) -> bool {
        self.copy_with_toast("link", &self.share.url, &self.text.link_copied, self.ui.link_toast)
            .await
    }

    /// Native share when available; otherwise, or if it is cancelled or
    /// fails, copy the page link instead.
    pub async fn share_page(&self) -> ShareOutcome {
        if self.share_sheet.is_available() {
            match self.share_sheet.share(&self.share).await {
                Ok(()) => {
                    debug!("Shared via share sheet");
                    return ShareOutcome::Shared;
                }
                Err(e) => info!(reason = %e, "Share sheet did not complete, copying link"),
            }
        } else {
            debug!("No share sheet, copying link");
        }

        if self.copy_link_fallback().await {
            ShareOutcome::CopiedLink
        } else {
            ShareOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied("NotAllowedError".into()))
        }
    }

    struct FakeShare {
        result: fn() -> Result<(), ShareError>,
        calls: Mutex<u32>,
    }

    impl ShareSheet for FakeShare {
        fn is_available(&self) -> bool {
            true
        }

        async fn share(&self, _request: &ShareRequest) -> Result<(), ShareError> {
            *self.calls.lock().unwrap() += 1;
            (self.result)()
        }
    }

    fn share_request() -> ShareRequest {
        ShareRequest {
            title: "Save Skyline Park".into(),
            text: "Help keep Skyline public".into(),
            url: "https://saveskyline.example/".into(),
        }
    }

    fn actions<C: Clipboard, S: ShareSheet>(clipboard: C, share: S) -> PageActions<C, S> {
        PageActions::new(
            clipboard,
            share,
            ToastTray::new(),
            ToastText::default(),
            UiConfig::default(),
            share_request(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_success_single_toast_dismissed() {
        let a = actions(MemoryClipboard::default(), NoShareSheet);
        assert!(a.copy_email("news@kcra.com").await);
        assert_eq!(a.clipboard().contents().as_deref(), Some("news@kcra.com"));

        let toasts = a.toasts().visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert_eq!(toasts[0].message, "Email copied — paste & send");

        tokio::time::sleep(Duration::from_millis(2499)).await;
        assert_eq!(a.toasts().visible().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(a.toasts().visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_failure_single_distinct_toast() {
        let a = actions(DeniedClipboard, NoShareSheet);
        assert!(!a.copy_template("Subject: x").await);

        let toasts = a.toasts().visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Failure);
        assert_eq!(toasts[0].message, COPY_FAILED_MESSAGE);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(a.toasts().visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_without_sheet_copies_link() {
        let a = actions(MemoryClipboard::default(), NoShareSheet);
        assert_eq!(a.share_page().await, ShareOutcome::CopiedLink);
        assert_eq!(a.clipboard().contents().as_deref(), Some("https://saveskyline.example/"));
        assert_eq!(a.toasts().visible()[0].message, ToastText::default().link_copied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_sheet_success_no_copy() {
        let share = FakeShare { result: || Ok(()), calls: Mutex::new(0) };
        let a = actions(MemoryClipboard::default(), share);
        assert_eq!(a.share_page().await, ShareOutcome::Shared);
        assert!(a.clipboard().contents().is_none());
        assert!(a.toasts().visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_cancel_falls_back() {
        let share = FakeShare { result: || Err(ShareError::Cancelled), calls: Mutex::new(0) };
        let a = actions(MemoryClipboard::default(), share);
        assert_eq!(a.share_page().await, ShareOutcome::CopiedLink);
        assert_eq!(*a.share_sheet.calls.lock().unwrap(), 1);
        assert_eq!(a.toasts().visible().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_fallback_copy_denied() {
        let a = actions(DeniedClipboard, NoShareSheet);
        assert_eq!(a.share_page().await, ShareOutcome::Failed);
        let toasts = a.toasts().visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Failure);
    }
}
