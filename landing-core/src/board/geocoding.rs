use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::BoardError,
    model::{City, CitySuggestion, display_name},
};

use super::get_json;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

/// Default number of autocomplete candidates.
pub const SUGGEST_LIMIT: usize = 6;

/// Name/coordinate resolution.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best single match for `query`.
    async fn resolve_by_name(&self, query: &str) -> Result<City, BoardError>;

    /// Autocomplete candidates for `prefix`. Failures yield an empty list.
    async fn suggest(&self, prefix: &str, limit: usize) -> Vec<CitySuggestion>;

    /// Nearest named place, or `None` when the provider has no match.
    async fn resolve_by_coordinates(&self, lat: f64, lon: f64)
    -> Result<Option<City>, BoardError>;
}

/// Open-Meteo geocoding API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    language: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
            http,
        }
    }

    async fn search(&self, name: &str, count: usize) -> Result<Vec<GeoResult>, BoardError> {
        let url = format!("{}/v1/search", self.base_url);
        let count = count.to_string();

        let parsed: GeoResponse = get_json(
            &self.http,
            &url,
            &[
                ("name", name),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
            "Geocoding",
        )
        .await?;

        Ok(parsed.results.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl GeoResult {
    fn label(&self) -> String {
        display_name(&self.name, self.country.as_deref().unwrap_or_default())
    }

    /// Provider id, or one derived from the coordinates when it is missing.
    fn city_id(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| City::coordinate_id(self.latitude, self.longitude))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve_by_name(&self, query: &str) -> Result<City, BoardError> {
        let first = self
            .search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::NotFound(query.to_string()))?;

        Ok(City::new(
            first.city_id(),
            first.label(),
            first.latitude,
            first.longitude,
        ))
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Vec<CitySuggestion> {
        match self.search(prefix, limit).await {
            Ok(results) => results
                .into_iter()
                .map(|r| CitySuggestion {
                    id: r.city_id(),
                    name: r.name,
                    country: r.country.unwrap_or_default(),
                    admin1: r.admin1.unwrap_or_default(),
                    lat: r.latitude,
                    lon: r.longitude,
                })
                .collect(),
            Err(err) => {
                tracing::debug!("Suggestion lookup for {prefix:?} failed: {err}");
                Vec::new()
            }
        }
    }

    async fn resolve_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<City>, BoardError> {
        let url = format!("{}/v1/reverse", self.base_url);
        let (lat_s, lon_s) = (lat.to_string(), lon.to_string());

        let parsed: GeoResponse = get_json(
            &self.http,
            &url,
            &[
                ("latitude", lat_s.as_str()),
                ("longitude", lon_s.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
            "Reverse geocoding",
        )
        .await?;

        let Some(place) = parsed.results.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let id = place
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("{lat},{lon}"));

        Ok(Some(City::new(id, place.label(), lat, lon)))
    }
}
