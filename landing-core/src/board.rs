//! City weather board: recent cities, geocoding, forecasts and the card list.

use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::{config::Config, error::BoardError, store::FileStore};

pub mod controller;
pub mod forecast;
pub mod geocoding;
pub mod location;
pub mod recent;
pub mod render;
pub mod suggest;

use controller::Board;
use forecast::OpenMeteoForecast;
use geocoding::OpenMeteoGeocoder;
use recent::RecentCitiesStore;

const USER_AGENT: &str = concat!("landing/", env!("CARGO_PKG_VERSION"));

/// Build a board wired to the configured endpoints and the on-disk store.
pub fn board_from_config(config: &Config) -> anyhow::Result<Board> {
    let http = Client::builder()
        .timeout(config.weather.request_timeout())
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let geocoder = OpenMeteoGeocoder::new(
        config.weather.geocoding_url.clone(),
        config.weather.language.clone(),
        http.clone(),
    );
    let weather = OpenMeteoForecast::new(config.weather.forecast_url.clone(), http);
    let store = FileStore::new(Config::store_file_path()?);

    Ok(Board::new(
        Arc::new(geocoder),
        Arc::new(weather),
        RecentCitiesStore::new(Box::new(store)),
    )
    .with_reverse_timeout(config.weather.reverse_timeout()))
}

/// GET `url` and decode a JSON body. Every failure maps to
/// [`BoardError::Network`]; `what` names the request in messages.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    what: &str,
) -> Result<T, BoardError> {
    tracing::debug!("{what} request: {url} {query:?}");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| BoardError::Network(format!("{what} request failed: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| BoardError::Network(format!("Failed to read {what} response body: {e}")))?;

    if !status.is_success() {
        return Err(BoardError::Network(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| BoardError::Network(format!("Failed to parse {what} JSON: {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
