use serde::Serialize;
use tracing::debug;

/// Mobile navigation menu. ARIA state and icon are derived from `open`.
#[derive(Debug, Default)]
pub struct MobileMenu {
    open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub open: bool,
    pub aria_expanded: &'static str,
    pub icon: &'static str,
}

impl MobileMenu {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Navigating from inside the menu closes it.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn view(&self) -> MenuView {
        MenuView {
            open: self.open,
            aria_expanded: if self.open { "true" } else { "false" },
            icon: if self.open { "fa-times" } else { "fa-bars" },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: String,
    pub visible: bool,
}

/// Reveal-on-scroll for page sections. A section becomes visible once and
/// stays visible.
#[derive(Debug)]
pub struct SectionReveal {
    threshold: f64,
    observer_installed: bool,
    sections: Vec<SectionView>,
}

impl SectionReveal {
    pub fn new(ids: &[String], threshold: f64, reduced_motion: bool) -> Self {
        let sections = ids
            .iter()
            .map(|id| SectionView {
                id: id.clone(),
                visible: reduced_motion,
            })
            .collect();
        debug!(count = ids.len(), reduced_motion, "section reveal installed");
        Self {
            threshold,
            observer_installed: !reduced_motion,
            sections,
        }
    }

    /// Whether an observer is still watching any section.
    pub fn is_observing(&self) -> bool {
        self.observer_installed && self.sections.iter().any(|s| !s.visible)
    }

    /// Intersection report for one section. Returns true if it was revealed
    /// by this report.
    pub fn on_intersect(&mut self, id: &str, ratio: f64) -> bool {
        if !self.observer_installed || ratio < self.threshold {
            return false;
        }
        match self.sections.iter_mut().find(|s| s.id == id && !s.visible) {
            Some(section) => {
                section.visible = true;
                true
            }
            None => false,
        }
    }

    pub fn sections(&self) -> &[SectionView] {
        &self.sections
    }
}

/// Back-to-top button, recomputed on every scroll event.
#[derive(Debug)]
pub struct BackToTop {
    ratio: f64,
    visible: bool,
}

impl BackToTop {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio,
            visible: false,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64, header_height: f64) {
        self.visible = scroll_y > header_height * self.ratio;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["about".into(), "history".into(), "action".into()]
    }

    #[test]
    fn test_menu_state_in_lockstep() {
        let mut menu = MobileMenu::default();
        assert_eq!(
            menu.view(),
            MenuView { open: false, aria_expanded: "false", icon: "fa-bars" }
        );
        menu.toggle();
        assert_eq!(
            menu.view(),
            MenuView { open: true, aria_expanded: "true", icon: "fa-times" }
        );
        menu.close();
        assert!(!menu.view().open);
        assert_eq!(menu.view().aria_expanded, "false");
        menu.close();
        assert_eq!(menu.view().icon, "fa-bars");
    }

    #[test]
    fn test_reduced_motion_reveals_everything() {
        let reveal = SectionReveal::new(&ids(), 0.15, true);
        assert!(reveal.sections().iter().all(|s| s.visible));
        assert!(!reveal.is_observing());
    }

    #[test]
    fn test_reveal_after_threshold_only() {
        let mut reveal = SectionReveal::new(&ids(), 0.15, false);
        assert!(reveal.is_observing());
        assert!(reveal.sections().iter().all(|s| !s.visible));

        assert!(!reveal.on_intersect("about", 0.1));
        assert!(!reveal.sections()[0].visible);
        assert!(reveal.on_intersect("about", 0.15));
        assert!(reveal.sections()[0].visible);

        // Once only
        assert!(!reveal.on_intersect("about", 0.9));
        assert!(!reveal.on_intersect("nope", 1.0));

        reveal.on_intersect("history", 0.5);
        reveal.on_intersect("action", 1.0);
        assert!(!reveal.is_observing());
    }

    #[test]
    fn test_reduced_motion_ignores_reports() {
        let mut reveal = SectionReveal::new(&ids(), 0.15, true);
        assert!(!reveal.on_intersect("about", 1.0));
    }

    #[test]
    fn test_back_to_top_recomputed() {
        let mut btn = BackToTop::new(0.8);
        btn.on_scroll(79.0, 100.0);
        assert!(!btn.is_visible());
        btn.on_scroll(80.0, 100.0);
        assert!(!btn.is_visible());
        btn.on_scroll(81.0, 100.0);
        assert!(btn.is_visible());
        // Header height changes (e.g. on resize) are picked up on the next event
        btn.on_scroll(81.0, 200.0);
        assert!(!btn.is_visible());
        btn.on_scroll(0.0, 200.0);
        assert!(!btn.is_visible());
    }
}
