use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Deserialize;

/// Browser-side events the page reacts to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    MenuToggle,
    MenuNavClick,
    Scroll { y: f64, header_height: f64 },
    SectionIntersect { id: String, ratio: f64 },
    AudioPrompt,
    AudioToggle,
    AudioTrackClick { offset_x: f64, width: f64 },
    AudioClose,
    MediaPlay,
    MediaPause,
    MediaTime { current: f64 },
    MediaLoaded { duration: f64 },
    MediaEnded,
    CopyEmail { email: String },
    CopyTemplate,
    Share,
    Compose { provider: String },
    AddressInput { value: String },
    AddressSubmit,
    AddressKey { key: String },
}

/// What a handler asks of the browser's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    PreventDefault,
}

type Handler = Box<dyn FnMut(&UiEvent) -> Flow>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Single-threaded event dispatch. Handlers run in registration order and
/// must not subscribe or emit from inside a handler.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

/// Disposer for a registered handler; dropping it unregisters the handler.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl FnMut(&UiEvent) -> Flow + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.handlers.push((id, Box::new(handler)));
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Run every handler; the default action is prevented if any handler asks.
    pub fn emit(&self, event: &UiEvent) -> Flow {
        let mut inner = self.inner.borrow_mut();
        let mut flow = Flow::Continue;
        for (_, handler) in inner.handlers.iter_mut() {
            if handler(event) == Flow::PreventDefault {
                flow = Flow::PreventDefault;
            }
        }
        flow
    }

    pub fn handler_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_emit_dispose() {
        let hub = EventHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let sub = hub.subscribe(move |e| {
            sink.borrow_mut().push(e.clone());
            Flow::Continue
        });
        assert_eq!(hub.handler_count(), 1);

        assert_eq!(hub.emit(&UiEvent::MenuToggle), Flow::Continue);
        drop(sub);
        assert_eq!(hub.handler_count(), 0);
        hub.emit(&UiEvent::MenuNavClick);

        assert_eq!(*seen.borrow(), vec![UiEvent::MenuToggle]);
    }

    #[test]
    fn test_any_handler_can_prevent_default() {
        let hub = EventHub::new();
        let _a = hub.subscribe(|_| Flow::Continue);
        let _b = hub.subscribe(|e| match e {
            UiEvent::AddressKey { key } if key == "Enter" => Flow::PreventDefault,
            _ => Flow::Continue,
        });
        assert_eq!(
            hub.emit(&UiEvent::AddressKey { key: "Enter".into() }),
            Flow::PreventDefault
        );
        assert_eq!(hub.emit(&UiEvent::AddressKey { key: "a".into() }), Flow::Continue);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = EventHub::new();
        let sub = hub.subscribe(|_| Flow::Continue);
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_events_deserialize() {
        let e: UiEvent = serde_json::from_str(r#"{"type":"scroll","y":120.5,"header_height":400}"#).unwrap();
        assert_eq!(e, UiEvent::Scroll { y: 120.5, header_height: 400.0 });
        let e: UiEvent = serde_json::from_str(r#"{"type":"copy_template"}"#).unwrap();
        assert_eq!(e, UiEvent::CopyTemplate);
        let e: UiEvent = serde_json::from_str(r#"{"type":"address_key","key":"Enter"}"#).unwrap();
        assert_eq!(e, UiEvent::AddressKey { key: "Enter".into() });
    }
}
