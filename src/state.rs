use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::compose::EmailTemplate;
use crate::content::ContentContext;
use crate::district::arcgis::ArcGisClient;
use crate::district::DistrictFinder;

/// Endpoints and network settings, read from the environment.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Content document: local path or http(s) URL.
    pub content_source: String,
    pub geocode_url: String,
    pub district_layer_url: String,
    pub http_timeout: Duration,
    /// Public page URL, used for sharing when the content document has none.
    pub site_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_source: "content.json".to_string(),
            geocode_url:
                "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates"
                    .to_string(),
            district_layer_url:
                "https://gis.countyofnapa.org/arcgis/rest/services/Boundaries/Supervisorial_Districts/MapServer/0/query"
                    .to_string(),
            http_timeout: Duration::from_secs(30),
            site_url: None,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let http_timeout = match dotenv::var("SKYLINE_HTTP_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.trim()
                    .parse::<u64>()
                    .context("SKYLINE_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            content_source: dotenv::var("SKYLINE_CONTENT_SOURCE")
                .unwrap_or(defaults.content_source),
            geocode_url: dotenv::var("SKYLINE_GEOCODE_URL").unwrap_or(defaults.geocode_url),
            district_layer_url: dotenv::var("SKYLINE_DISTRICT_LAYER_URL")
                .unwrap_or(defaults.district_layer_url),
            http_timeout,
            site_url: dotenv::var("SKYLINE_SITE_URL").ok().filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .context("Failed to create HTTP client")
    }
}

/// Presentation timings and thresholds.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub email_toast: Duration,
    pub template_toast: Duration,
    pub link_toast: Duration,
    pub failure_toast: Duration,
    /// Fraction of a section that must be in view before it is revealed.
    pub reveal_threshold: f64,
    /// Back-to-top shows once scrolled past this fraction of the header height.
    pub back_to_top_ratio: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            email_toast: Duration::from_millis(2500),
            template_toast: Duration::from_millis(3000),
            link_toast: Duration::from_millis(2500),
            failure_toast: Duration::from_millis(3000),
            reveal_threshold: 0.15,
            back_to_top_ratio: 0.8,
        }
    }
}

pub struct AppState {
    pub config: SiteConfig,
    pub ui: UiConfig,
    pub content: Arc<ContentContext>,
    pub finder: Arc<DistrictFinder<ArcGisClient>>,
    geo: ArcGisClient,
}

impl AppState {
    /// Load the content document once and build everything that reads it.
    pub async fn init(config: SiteConfig) -> Result<Self> {
        let client = config.http_client()?;
        let content = Arc::new(ContentContext::load(&config.content_source, &client).await);
        let geo = ArcGisClient::new(client, &config);
        let finder = Arc::new(DistrictFinder::new(
            geo.clone(),
            EmailTemplate::from_context(&content),
        ));

        info!(
            source = %config.content_source,
            fallback = content.is_fallback(),
            "Site content ready"
        );

        Ok(Self {
            config,
            ui: UiConfig::default(),
            content,
            finder,
            geo,
        })
    }

    /// A finder that mails with `template` instead of the document's letter.
    pub fn finder_with(&self, template: EmailTemplate) -> Arc<DistrictFinder<ArcGisClient>> {
        Arc::new(DistrictFinder::new(self.geo.clone(), template))
    }

    /// Page URL for sharing: the content document's, then the configured one.
    pub fn page_url(&self) -> String {
        self.content
            .meta()
            .site_url
            .clone()
            .or_else(|| self.config.site_url.clone())
            .unwrap_or_default()
    }
}
