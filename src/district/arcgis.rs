use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::debug;

use super::{DistrictHit, GeoService, GeocodeCandidate, Point};
use crate::state::SiteConfig;

/// Client for the ArcGIS geocoder and the supervisorial district layer.
#[derive(Clone)]
pub struct ArcGisClient {
    client: reqwest::Client,
    geocode_url: String,
    district_layer_url: String,
}

impl ArcGisClient {
    pub fn new(client: reqwest::Client, config: &SiteConfig) -> Self {
        Self {
            client,
            geocode_url: config.geocode_url.clone(),
            district_layer_url: config.district_layer_url.clone(),
        }
    }

    /// `findAddressCandidates` request for the single best match.
    pub fn geocode_request(&self, single_line: &str) -> Result<reqwest::Request> {
        self.client
            .get(&self.geocode_url)
            .query(&[
                ("SingleLine", single_line),
                ("maxLocations", "1"),
                ("outFields", "Match_addr"),
                ("outSR", "4326"),
                ("f", "json"),
            ])
            .build()
            .context("Failed to build geocode request")
    }

    /// Point-in-polygon query against the district layer.
    pub fn district_request(&self, point: Point) -> Result<reqwest::Request> {
        let geometry = format!("{},{}", point.x, point.y);
        self.client
            .get(&self.district_layer_url)
            .query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("inSR", "4326"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("outFields", "sup_district"),
                ("returnGeometry", "false"),
                ("f", "json"),
            ])
            .build()
            .context("Failed to build district query")
    }

    async fn execute_json(&self, req: reqwest::Request) -> Result<Value> {
        let resp = self
            .client
            .execute(req)
            .await
            .context("ArcGIS request failed")?
            .error_for_status()
            .context("ArcGIS returned an error status")?;
        let text = resp.text().await.context("Failed to read ArcGIS response")?;
        let json: Value = serde_json::from_str(&text).context("Failed to parse ArcGIS JSON")?;

        // ArcGIS reports service errors in a 200 body
        if let Some(err) = json.get("error") {
            bail!(
                "ArcGIS error {}: {}",
                err["code"].as_i64().unwrap_or_default(),
                err["message"].as_str().unwrap_or("unknown")
            );
        }
        Ok(json)
    }
}

impl GeoService for ArcGisClient {
    async fn geocode(&self, single_line: &str) -> Result<Option<GeocodeCandidate>> {
        let req = self.geocode_request(single_line)?;
        let json = self.execute_json(req).await?;
        let candidate = parse_best_candidate(&json)?;
        debug!(
            found = candidate.is_some(),
            score = candidate.as_ref().map(|c| c.score),
            "geocode response"
        );
        Ok(candidate)
    }

    async fn district_at(&self, point: Point) -> Result<Option<DistrictHit>> {
        let req = self.district_request(point)?;
        let json = self.execute_json(req).await?;
        let district = parse_district(&json);
        debug!(x = point.x, y = point.y, district = ?district, "district query response");
        Ok(district)
    }
}

/// `candidates[0]`, if any.
pub fn parse_best_candidate(json: &Value) -> Result<Option<GeocodeCandidate>> {
    let Some(first) = json["candidates"].get(0) else {
        return Ok(None);
    };
    let candidate = serde_json::from_value(first.clone()).context("Malformed geocode candidate")?;
    Ok(Some(candidate))
}

/// `features[0]`, with its `attributes.sup_district` stringified. The layer
/// stores the id as either a string or a number; a feature without a usable
/// id is still a hit.
pub fn parse_district(json: &Value) -> Option<DistrictHit> {
    let feature = json["features"].get(0)?;
    let id = match &feature["attributes"]["sup_district"] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    };
    Some(DistrictHit { id })
}
