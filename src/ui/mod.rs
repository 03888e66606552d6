pub mod chrome;
pub mod clipboard;
pub mod events;
pub mod player;
pub mod toast;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::compose::{self, ComposeAction, EmailTemplate};
use crate::content::ContentContext;
use crate::district::{self, DistrictFinder, FinderView, GeoService};
use crate::state::UiConfig;

use chrome::{BackToTop, MenuView, MobileMenu, SectionReveal, SectionView};
use clipboard::{Clipboard, PageActions, ShareOutcome, ShareRequest, ShareSheet};
use events::{EventHub, Flow, Subscription, UiEvent};
use player::{AudioPlayer, MediaCommand, MediaEvent, PlayerView};
use toast::{Toast, ToastTray};

/// Facts about the page the controllers are attached to.
#[derive(Debug, Clone)]
pub struct PageEnv {
    pub page_url: String,
    /// Ids of the sections that reveal on scroll.
    pub sections: Vec<String>,
    pub prefers_reduced_motion: bool,
    pub has_audio: bool,
    /// Letter shown in the page's `#template` element, when a page is bound.
    /// Without one the content document's template is used.
    pub template: Option<EmailTemplate>,
}

/// Result of dispatching one event.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub default_prevented: bool,
    pub compose: Option<ComposeAction>,
    pub share: Option<ShareOutcome>,
    pub lookup: Option<district::LookupOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSnapshot {
    pub menu: MenuView,
    pub back_to_top_visible: bool,
    pub sections: Vec<SectionView>,
    pub player: PlayerView,
    pub finder: FinderView,
    pub toasts: Vec<Toast>,
    pub address: String,
}

/// Every interactive controller on the page, built once from one content
/// context. Synchronous controllers are registered on the event hub; copy,
/// share, compose and lookup are awaited directly by [`Site::dispatch`].
pub struct Site<C, S, G> {
    hub: EventHub,
    subscriptions: Vec<Subscription>,
    menu: Rc<RefCell<MobileMenu>>,
    reveal: Rc<RefCell<SectionReveal>>,
    back_to_top: Rc<RefCell<BackToTop>>,
    player: Rc<RefCell<AudioPlayer>>,
    pending_media: Rc<RefCell<Vec<MediaCommand>>>,
    actions: PageActions<C, S>,
    finder: Arc<DistrictFinder<G>>,
    template: EmailTemplate,
    address: String,
}

impl<C: Clipboard, S: ShareSheet, G: GeoService> Site<C, S, G> {
    pub fn new(
        ctx: &ContentContext,
        ui: &UiConfig,
        env: &PageEnv,
        clipboard: C,
        share_sheet: S,
        finder: Arc<DistrictFinder<G>>,
    ) -> Self {
        let meta = ctx.meta();
        let share = ShareRequest {
            title: meta
                .title
                .clone()
                .unwrap_or_else(|| compose::DEFAULT_SUBJECT.to_string()),
            text: meta.share_text.clone().unwrap_or_default(),
            url: meta.site_url.clone().unwrap_or_else(|| env.page_url.clone()),
        };
        let actions = PageActions::new(
            clipboard,
            share_sheet,
            ToastTray::new(),
            ctx.toasts().clone(),
            ui.clone(),
            share,
        );

        let mut player = AudioPlayer::new();
        if env.has_audio {
            player.mount();
        }

        let mut site = Self {
            hub: EventHub::new(),
            subscriptions: Vec::new(),
            menu: Rc::new(RefCell::new(MobileMenu::default())),
            reveal: Rc::new(RefCell::new(SectionReveal::new(
                &env.sections,
                ui.reveal_threshold,
                env.prefers_reduced_motion,
            ))),
            back_to_top: Rc::new(RefCell::new(BackToTop::new(ui.back_to_top_ratio))),
            player: Rc::new(RefCell::new(player)),
            pending_media: Rc::new(RefCell::new(Vec::new())),
            actions,
            finder,
            template: env
                .template
                .clone()
                .unwrap_or_else(|| EmailTemplate::from_context(ctx)),
            address: String::new(),
        };
        site.register_handlers();
        site
    }

    fn register_handlers(&mut self) {
        let menu = Rc::clone(&self.menu);
        self.subscriptions.push(self.hub.subscribe(move |e| {
            match e {
                UiEvent::MenuToggle => menu.borrow_mut().toggle(),
                UiEvent::MenuNavClick => menu.borrow_mut().close(),
                _ => {}
            }
            Flow::Continue
        }));

        let back_to_top = Rc::clone(&self.back_to_top);
        self.subscriptions.push(self.hub.subscribe(move |e| {
            if let UiEvent::Scroll { y, header_height } = e {
                back_to_top.borrow_mut().on_scroll(*y, *header_height);
            }
            Flow::Continue
        }));

        // Reduced motion installs no observer at all
        if self.reveal.borrow().is_observing() {
            let reveal = Rc::clone(&self.reveal);
            self.subscriptions.push(self.hub.subscribe(move |e| {
                if let UiEvent::SectionIntersect { id, ratio } = e {
                    if reveal.borrow_mut().on_intersect(id, *ratio) {
                        debug!(section = %id, "section revealed");
                    }
                }
                Flow::Continue
            }));
        }

        let player = Rc::clone(&self.player);
        let pending = Rc::clone(&self.pending_media);
        self.subscriptions.push(self.hub.subscribe(move |e| {
            let mut player = player.borrow_mut();
            let commands = match e {
                UiEvent::AudioPrompt => player.click_prompt(),
                UiEvent::AudioToggle => player.toggle(),
                UiEvent::AudioTrackClick { offset_x, width } => player.click_track(*offset_x, *width),
                UiEvent::AudioClose => player.close(),
                _ => {
                    if let Some(media) = media_event(e) {
                        player.on_media(media);
                    }
                    Vec::new()
                }
            };
            pending.borrow_mut().extend(commands);
            Flow::Continue
        }));

        self.subscriptions.push(self.hub.subscribe(|e| match e {
            UiEvent::AddressKey { key } if district::is_submit_key(key) => Flow::PreventDefault,
            _ => Flow::Continue,
        }));
    }

    /// Drop every registered handler; later events reach no controller.
    pub fn teardown(&mut self) {
        self.subscriptions.clear();
    }

    pub async fn dispatch(&mut self, event: &UiEvent) -> Dispatch {
        let flow = self.hub.emit(event);
        self.settle_media();

        let mut out = Dispatch {
            default_prevented: flow == Flow::PreventDefault,
            ..Default::default()
        };
        if self.subscriptions.is_empty() {
            return out;
        }

        match event {
            UiEvent::CopyEmail { email } => {
                self.actions.copy_email(email).await;
            }
            UiEvent::CopyTemplate => {
                self.actions.copy_template(self.template.text()).await;
            }
            UiEvent::Share => out.share = Some(self.actions.share_page().await),
            UiEvent::Compose { provider } => {
                out.compose = compose::open_compose(&self.template, provider);
            }
            UiEvent::AddressInput { value } => self.address = value.clone(),
            UiEvent::AddressSubmit => out.lookup = Some(self.finder.lookup(&self.address).await),
            UiEvent::AddressKey { .. } if out.default_prevented => {
                out.lookup = Some(self.finder.lookup(&self.address).await);
            }
            _ => {}
        }
        out
    }

    /// Headless audio element: commands take effect immediately and come
    /// back as the matching media events.
    fn settle_media(&self) {
        let commands: Vec<MediaCommand> = self.pending_media.borrow_mut().drain(..).collect();
        let mut player = self.player.borrow_mut();
        for command in commands {
            match command {
                MediaCommand::Play => player.on_media(MediaEvent::Play),
                MediaCommand::Pause => player.on_media(MediaEvent::Pause),
                MediaCommand::Seek(t) => player.on_media(MediaEvent::TimeUpdate { current: t }),
            }
        }
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot {
            menu: self.menu.borrow().view(),
            back_to_top_visible: self.back_to_top.borrow().is_visible(),
            sections: self.reveal.borrow().sections().to_vec(),
            player: self.player.borrow().view(),
            finder: self.finder.view(),
            toasts: self.actions.toasts().visible(),
            address: self.address.clone(),
        }
    }

    pub fn actions(&self) -> &PageActions<C, S> {
        &self.actions
    }
}

fn media_event(e: &UiEvent) -> Option<MediaEvent> {
    Some(match e {
        UiEvent::MediaPlay => MediaEvent::Play,
        UiEvent::MediaPause => MediaEvent::Pause,
        UiEvent::MediaTime { current } => MediaEvent::TimeUpdate { current: *current },
        UiEvent::MediaLoaded { duration } => MediaEvent::LoadedMetadata { duration: *duration },
        UiEvent::MediaEnded => MediaEvent::Ended,
        _ => return None,
    })
}
