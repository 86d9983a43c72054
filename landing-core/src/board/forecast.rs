use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::BoardError,
    model::{CurrentConditions, DailyForecast, WeatherSnapshot},
};

use super::get_json;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";

/// Number of daily entries kept in a snapshot.
pub const FORECAST_DAYS: usize = 3;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Current conditions and a short daily forecast in one request.
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, BoardError>;
}

/// Open-Meteo forecast API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<NaiveDate>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
    daily: OmDaily,
}

impl From<OmForecastResponse> for WeatherSnapshot {
    fn from(res: OmForecastResponse) -> Self {
        let OmForecastResponse { current, daily } = res;

        let forecast = daily
            .time
            .into_iter()
            .zip(daily.weather_code)
            .zip(daily.temperature_2m_max.into_iter().zip(daily.temperature_2m_min))
            .take(FORECAST_DAYS)
            .map(|((date, code), (high_c, low_c))| DailyForecast {
                date,
                code,
                high_c,
                low_c,
            })
            .collect();

        WeatherSnapshot {
            current: CurrentConditions {
                temperature_c: current.temperature_2m,
                humidity_pct: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
                wind_speed_kmh: current.wind_speed_10m,
                code: current.weather_code,
            },
            forecast,
        }
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoForecast {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, BoardError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let (lat_s, lon_s) = (lat.to_string(), lon.to_string());

        let parsed: OmForecastResponse = get_json(
            &self.http,
            &url,
            &[
                ("latitude", lat_s.as_str()),
                ("longitude", lon_s.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ],
            "Weather",
        )
        .await?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body() -> serde_json::Value {
        json!({
            "latitude": 48.86,
            "longitude": 2.34,
            "current": {
                "time": "2026-10-17T12:00",
                "temperature_2m": 14.6,
                "relative_humidity_2m": 71,
                "wind_speed_10m": 12.4,
                "weather_code": 3
            },
            "daily": {
                "time": ["2026-10-17", "2026-10-18", "2026-10-19", "2026-10-20"],
                "weather_code": [3, 61, 0, 2],
                "temperature_2m_max": [16.2, 13.9, 18.0, 17.1],
                "temperature_2m_min": [9.1, 8.4, 7.7, 10.0]
            }
        })
    }

    #[tokio::test]
    async fn fetch_requests_current_and_daily_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85"))
            .and(query_param("longitude", "2.35"))
            .and(query_param("current", CURRENT_FIELDS))
            .and(query_param("daily", DAILY_FIELDS))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let client = OpenMeteoForecast::new(server.uri(), Client::new());
        let snapshot = client.fetch(48.85, 2.35).await.unwrap();

        assert_eq!(snapshot.current.temperature_c, 14.6);
        assert_eq!(snapshot.current.humidity_pct, 71);
        assert_eq!(snapshot.current.code, 3);
        assert_eq!(snapshot.forecast.len(), FORECAST_DAYS);
        assert_eq!(
            snapshot.forecast[1],
            DailyForecast {
                date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
                code: 61,
                high_c: 13.9,
                low_c: 8.4,
            }
        );
    }

    #[tokio::test]
    async fn short_daily_series_is_kept_as_is() {
        let mut body = forecast_body();
        body["daily"] = json!({
            "time": ["2026-10-17"],
            "weather_code": [0],
            "temperature_2m_max": [20.0],
            "temperature_2m_min": [10.0]
        });

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = OpenMeteoForecast::new(server.uri(), Client::new());
        assert_eq!(client.fetch(0.0, 0.0).await.unwrap().forecast.len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = OpenMeteoForecast::new(server.uri(), Client::new());
        let err = client.fetch(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, BoardError::Network(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn malformed_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"current\": {}}"))
            .mount(&server)
            .await;

        let client = OpenMeteoForecast::new(server.uri(), Client::new());
        assert!(matches!(client.fetch(1.0, 2.0).await, Err(BoardError::Network(_))));
    }
}
