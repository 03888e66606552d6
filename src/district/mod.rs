pub mod arcgis;
pub mod supervisors;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::compose::EmailTemplate;
use supervisors::ContactCard;

/// Geocode matches scoring below this are treated as not found.
pub const MIN_MATCH_SCORE: f64 = 70.0;

/// Addresses that don't mention the county get this appended.
pub const JURISDICTION: &str = "napa";
pub const JURISDICTION_SUFFIX: &str = ", Napa, CA";

pub const NOT_FOUND_MESSAGE: &str =
    "We couldn't find that address. Try including the street number and city.";
pub const NOT_COVERED_MESSAGE: &str =
    "That address doesn't fall inside a Napa County supervisor district. \
     Call the Clerk of the Board at (707) 253-4580 to find out who represents you.";
pub const FAILED_MESSAGE: &str =
    "Something went wrong looking up your district. Please try again in a moment.";

const SUBMIT_LABEL: &str = "Find my supervisor";
const SUBMIT_ICON: &str = "fa-search";
const LOADING_LABEL: &str = "Looking up…";
const LOADING_ICON: &str = "fa-spinner fa-spin";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateAttributes {
    #[serde(rename = "Match_addr", default)]
    pub match_addr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeCandidate {
    pub location: Point,
    pub score: f64,
    #[serde(default)]
    pub attributes: CandidateAttributes,
}

/// A feature returned by the containment query. `id` is `None` when the
/// layer left `sup_district` empty; such a hit still gets a (clerk) card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictHit {
    pub id: Option<String>,
}

/// The two remote queries the lookup chains together.
pub trait GeoService {
    /// Best single candidate for a one-line address.
    async fn geocode(&self, single_line: &str) -> anyhow::Result<Option<GeocodeCandidate>>;
    /// Supervisor district feature containing the point, if any.
    async fn district_at(&self, point: Point) -> anyhow::Result<Option<DistrictHit>>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no geocode match above the confidence threshold")]
    GeocodeNotFound,
    #[error("no supervisor district contains the matched point")]
    DistrictNotCovered,
    #[error("district lookup failed")]
    LookupFailed(#[source] anyhow::Error),
}

impl LookupError {
    /// The literal text shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::GeocodeNotFound => NOT_FOUND_MESSAGE,
            LookupError::DistrictNotCovered => NOT_COVERED_MESSAGE,
            LookupError::LookupFailed(_) => FAILED_MESSAGE,
        }
    }
}

#[derive(Debug)]
pub enum LookupOutcome {
    /// Blank input; nothing happened.
    Ignored,
    Found(ContactCard),
    Failed(LookupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinderPhase {
    Idle,
    Loading,
    Result,
    Error,
}

/// Everything the finder widget shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinderView {
    pub phase: FinderPhase,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub submit_icon: &'static str,
    /// Result panel; `None` means hidden.
    pub result: Option<ContactCard>,
    /// Error line; `None` means hidden.
    pub error: Option<&'static str>,
    /// District highlighted in the static supervisor directory.
    pub highlighted_district: Option<String>,
}

impl Default for FinderView {
    fn default() -> Self {
        Self {
            phase: FinderPhase::Idle,
            submit_enabled: true,
            submit_label: SUBMIT_LABEL,
            submit_icon: SUBMIT_ICON,
            result: None,
            error: None,
            highlighted_district: None,
        }
    }
}

impl FinderView {
    fn begin_loading(&mut self) {
        self.phase = FinderPhase::Loading;
        self.submit_enabled = false;
        self.submit_label = LOADING_LABEL;
        self.submit_icon = LOADING_ICON;
        self.result = None;
        self.error = None;
        self.highlighted_district = None;
    }

    fn show_result(&mut self, card: ContactCard) {
        self.phase = FinderPhase::Result;
        self.highlighted_district = (!card.is_fallback).then(|| card.district.clone());
        self.result = Some(card);
        self.error = None;
    }

    fn show_error(&mut self, message: &'static str) {
        self.phase = FinderPhase::Error;
        self.result = None;
        self.error = Some(message);
    }

    fn restore_submit(&mut self) {
        self.submit_enabled = true;
        self.submit_label = SUBMIT_LABEL;
        self.submit_icon = SUBMIT_ICON;
    }
}

/// Append the jurisdiction unless the address already names it.
pub fn qualify_address(input: &str) -> String {
    if input.to_lowercase().contains(JURISDICTION) {
        input.to_string()
    } else {
        format!("{}{}", input, JURISDICTION_SUFFIX)
    }
}

/// Enter in the address field submits (and suppresses form submission).
pub fn is_submit_key(key: &str) -> bool {
    key == "Enter"
}

/// Address → district → supervisor lookup.
///
/// Lookups are never cancelled. Each one takes a ticket; if a lookup resolves
/// after a newer one has started, its result still replaces whatever is shown
/// and a stale-render warning is logged.
pub struct DistrictFinder<G> {
    geo: G,
    template: EmailTemplate,
    view: Mutex<FinderView>,
    issued: AtomicU64,
    stale_renders: AtomicU64,
}

impl<G: GeoService> DistrictFinder<G> {
    pub fn new(geo: G, template: EmailTemplate) -> Self {
        Self {
            geo,
            template,
            view: Mutex::new(FinderView::default()),
            issued: AtomicU64::new(0),
            stale_renders: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> FinderView {
        self.view.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Lookups that rendered after a newer lookup had already started.
    pub fn stale_renders(&self) -> u64 {
        self.stale_renders.load(Ordering::SeqCst)
    }

    fn update(&self, f: impl FnOnce(&mut FinderView)) {
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut view);
    }

    pub async fn lookup(&self, input: &str) -> LookupOutcome {
        let input = input.trim();
        if input.is_empty() {
            return LookupOutcome::Ignored;
        }

        let query = qualify_address(input);
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(FinderView::begin_loading);
        info!(ticket, query = %query, "District lookup started");

        let result = self.resolve(&query).await;

        let latest = self.issued.load(Ordering::SeqCst);
        if ticket < latest {
            self.stale_renders.fetch_add(1, Ordering::SeqCst);
            warn!(ticket, latest, "Stale district lookup rendering over a newer lookup");
        }

        let outcome = match result {
            Ok(card) => {
                info!(
                    ticket,
                    district = %card.district,
                    supervisor = card.supervisor.name,
                    fallback = card.is_fallback,
                    "District lookup succeeded"
                );
                self.update(|v| v.show_result(card.clone()));
                LookupOutcome::Found(card)
            }
            Err(e) => {
                match &e {
                    LookupError::LookupFailed(cause) => {
                        warn!(ticket, error = ?cause, "District lookup failed")
                    }
                    other => info!(ticket, reason = %other, "District lookup found nothing"),
                }
                self.update(|v| v.show_error(e.user_message()));
                LookupOutcome::Failed(e)
            }
        };

        self.update(FinderView::restore_submit);
        outcome
    }

    async fn resolve(&self, query: &str) -> Result<ContactCard, LookupError> {
        let candidate = self
            .geo
            .geocode(query)
            .await
            .map_err(LookupError::LookupFailed)?
            .ok_or(LookupError::GeocodeNotFound)?;

        if candidate.score < MIN_MATCH_SCORE {
            info!(score = candidate.score, "Geocode match below confidence threshold");
            return Err(LookupError::GeocodeNotFound);
        }

        let hit = self
            .geo
            .district_at(candidate.location)
            .await
            .map_err(LookupError::LookupFailed)?
            .ok_or(LookupError::DistrictNotCovered)?;

        Ok(ContactCard::new(
            hit.id.as_deref().unwrap_or_default(),
            candidate.attributes.match_addr,
            &self.template,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// Scripted geocoder that records the queries it receives.
    #[derive(Default)]
    struct FakeGeo {
        score: Option<f64>,
        district: Option<&'static str>,
        fail_geocode: bool,
        fail_district: bool,
        /// The layer returns a feature with an empty district id.
        blank_district: bool,
        queries: StdMutex<Vec<String>>,
        district_calls: StdMutex<u32>,
    }

    impl GeoService for FakeGeo {
        async fn geocode(&self, single_line: &str) -> anyhow::Result<Option<GeocodeCandidate>> {
            self.queries.lock().unwrap().push(single_line.to_string());
            if self.fail_geocode {
                anyhow::bail!("connection reset");
            }
            Ok(self.score.map(|score| GeocodeCandidate {
                location: Point { x: -122.28, y: 38.29 },
                score,
                attributes: CandidateAttributes {
                    match_addr: Some("123 Main St, Napa, California, 94559".into()),
                },
            }))
        }

        async fn district_at(&self, _point: Point) -> anyhow::Result<Option<DistrictHit>> {
            *self.district_calls.lock().unwrap() += 1;
            if self.fail_district {
                anyhow::bail!("layer offline");
            }
            if self.blank_district {
                return Ok(Some(DistrictHit { id: None }));
            }
            Ok(self.district.map(|d| DistrictHit { id: Some(d.to_string()) }))
        }
    }

    fn finder(geo: FakeGeo) -> DistrictFinder<FakeGeo> {
        DistrictFinder::new(
            geo,
            EmailTemplate::new("Subject: Skyline\n\nDear [Media Contact / Supervisor],"),
        )
    }

    #[test]
    fn test_qualify_address() {
        assert_eq!(qualify_address("123 Main St"), "123 Main St, Napa, CA");
        assert_eq!(qualify_address("123 Main St, NAPA"), "123 Main St, NAPA");
        assert_eq!(qualify_address("1 Napa Valley Corporate Dr"), "1 Napa Valley Corporate Dr");
    }

    #[test]
    fn test_submit_key() {
        assert!(is_submit_key("Enter"));
        assert!(!is_submit_key("a"));
        assert!(!is_submit_key("Tab"));
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let f = finder(FakeGeo::default());
        assert!(matches!(f.lookup("   ").await, LookupOutcome::Ignored));
        assert!(f.geo.queries.lock().unwrap().is_empty());
        assert_eq!(f.view(), FinderView::default());
    }

    #[tokio::test]
    async fn test_query_gets_jurisdiction_suffix() {
        let f = finder(FakeGeo { score: Some(95.0), district: Some("3"), ..Default::default() });
        f.lookup("  123 Main St ").await;
        assert_eq!(*f.geo.queries.lock().unwrap(), vec!["123 Main St, Napa, CA".to_string()]);
    }

    #[tokio::test]
    async fn test_score_threshold_boundary() {
        let low = finder(FakeGeo { score: Some(69.0), district: Some("3"), ..Default::default() });
        assert!(matches!(
            low.lookup("123 Main St").await,
            LookupOutcome::Failed(LookupError::GeocodeNotFound)
        ));
        assert_eq!(*low.geo.district_calls.lock().unwrap(), 0);

        let ok = finder(FakeGeo { score: Some(70.0), district: Some("3"), ..Default::default() });
        assert!(matches!(ok.lookup("123 Main St").await, LookupOutcome::Found(_)));
        assert_eq!(*ok.geo.district_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_found_district_three() {
        let f = finder(FakeGeo { score: Some(100.0), district: Some("3"), ..Default::default() });
        let LookupOutcome::Found(card) = f.lookup("123 Main St").await else {
            panic!("expected a result");
        };
        assert_eq!(card.supervisor.name, "Anne Cottrell");
        assert_eq!(card.tel_href, "tel:+17072534827");
        assert!(card.to_html().contains("Anne Cottrell"));

        let view = f.view();
        assert_eq!(view.phase, FinderPhase::Result);
        assert!(view.submit_enabled);
        assert_eq!(view.submit_label, SUBMIT_LABEL);
        assert_eq!(view.error, None);
        assert_eq!(view.highlighted_district.as_deref(), Some("3"));
        assert_eq!(view.result, Some(card));
    }

    #[tokio::test]
    async fn test_unmapped_district_uses_clerk() {
        let f = finder(FakeGeo { score: Some(88.0), district: Some("9"), ..Default::default() });
        let LookupOutcome::Found(card) = f.lookup("123 Main St").await else {
            panic!("expected a result");
        };
        assert!(card.is_fallback);
        assert_eq!(card.supervisor.phone, "(707) 253-4580");
        assert_eq!(f.view().highlighted_district, None);
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let none = finder(FakeGeo::default());
        none.lookup("nowhere").await;
        assert_eq!(none.view().error, Some(NOT_FOUND_MESSAGE));

        let uncovered = finder(FakeGeo { score: Some(90.0), ..Default::default() });
        uncovered.lookup("1 Ocean Ave, San Francisco").await;
        assert_eq!(uncovered.view().error, Some(NOT_COVERED_MESSAGE));

        let broken = finder(FakeGeo { fail_geocode: true, ..Default::default() });
        broken.lookup("123 Main St").await;
        let view = broken.view();
        assert_eq!(view.error, Some(FAILED_MESSAGE));
        assert_eq!(view.phase, FinderPhase::Error);
        assert_eq!(view.result, None);
        assert!(view.submit_enabled);

        let layer_down = finder(FakeGeo { score: Some(90.0), fail_district: true, ..Default::default() });
        assert!(matches!(
            layer_down.lookup("123 Main St").await,
            LookupOutcome::Failed(LookupError::LookupFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_new_lookup_replaces_previous_result() {
        let f = finder(FakeGeo { score: Some(90.0), district: Some("2"), ..Default::default() });
        f.lookup("123 Main St").await;
        assert!(f.view().result.is_some());

        // Same finder, now the address is not covered: result panel hides
        let f2 = DistrictFinder { geo: FakeGeo { score: Some(90.0), ..Default::default() }, ..f };
        f2.lookup("456 Elm St").await;
        let view = f2.view();
        assert!(view.result.is_none());
        assert_eq!(view.error, Some(NOT_COVERED_MESSAGE));
        // The directory no longer points at the earlier supervisor
        assert_eq!(view.highlighted_district, None);
    }

    #[tokio::test]
    async fn test_blank_district_on_returned_feature_uses_clerk() {
        let f = finder(FakeGeo { score: Some(90.0), blank_district: true, ..Default::default() });
        let LookupOutcome::Found(card) = f.lookup("123 Main St").await else {
            panic!("a returned feature always yields a card");
        };
        assert!(card.is_fallback);
        assert_eq!(card.supervisor.name, "Clerk of the Board");
        assert_eq!(f.view().error, None);
    }

    /// Geocoder whose first street waits for a release; the district is the
    /// street number.
    struct GatedGeo {
        first_gate: Notify,
    }

    impl GeoService for GatedGeo {
        async fn geocode(&self, single_line: &str) -> anyhow::Result<Option<GeocodeCandidate>> {
            if single_line.starts_with("1 ") {
                self.first_gate.notified().await;
            }
            let number: f64 = single_line.split(' ').next().unwrap_or("0").parse()?;
            Ok(Some(GeocodeCandidate {
                location: Point { x: number, y: 38.3 },
                score: 95.0,
                attributes: CandidateAttributes { match_addr: Some(single_line.to_string()) },
            }))
        }

        async fn district_at(&self, point: Point) -> anyhow::Result<Option<DistrictHit>> {
            Ok(Some(DistrictHit { id: Some((point.x as i64).to_string()) }))
        }
    }

    #[tokio::test]
    async fn test_late_lookup_still_renders_and_is_counted() {
        let f = DistrictFinder::new(
            GatedGeo { first_gate: Notify::new() },
            EmailTemplate::new("Subject: Skyline\n\nDear [Media Contact / Supervisor],"),
        );

        // First lookup stalls in geocoding; the second one completes, then
        // releases the first.
        let (first, second) = tokio::join!(f.lookup("1 First St"), async {
            while f.view().phase != FinderPhase::Loading {
                tokio::task::yield_now().await;
            }
            let out = f.lookup("2 Second St").await;
            assert_eq!(
                f.view().result.as_ref().map(|c| c.district.as_str()),
                Some("2")
            );
            f.geo.first_gate.notify_one();
            out
        });

        let (LookupOutcome::Found(first), LookupOutcome::Found(second)) = (first, second) else {
            panic!("both lookups should find a district");
        };
        assert_eq!(first.district, "1");
        assert_eq!(second.district, "2");

        // The older lookup resolved last and its card is what is shown
        let view = f.view();
        assert_eq!(view.result, Some(first));
        assert_eq!(view.highlighted_district.as_deref(), Some("1"));
        assert_eq!(f.stale_renders(), 1);
    }
}
