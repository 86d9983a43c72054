use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name given to cities created from the device position.
pub const MY_LOCATION: &str = "My Location";

/// A city shown on the board and remembered in the recent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            place_name: None,
            lat,
            lon,
        }
    }

    pub fn with_place_name(mut self, place_name: impl Into<String>) -> Self {
        self.place_name = Some(place_name.into());
        self
    }

    /// Id synthesized from coordinates rounded to three decimals.
    pub fn coordinate_id(lat: f64, lon: f64) -> String {
        format!("{lat:.3},{lon:.3}")
    }
}

/// One autocomplete candidate returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub id: String,
    pub name: String,
    pub country: String,
    pub admin1: String,
    pub lat: f64,
    pub lon: f64,
}

impl CitySuggestion {
    /// "Name, Country", or just the name when the country is unknown.
    pub fn label(&self) -> String {
        display_name(&self.name, &self.country)
    }

    pub fn to_city(&self) -> City {
        City::new(self.id.clone(), self.label(), self.lat, self.lon)
    }
}

/// A device position reported by a location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    /// WMO weather code.
    pub code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub code: i32,
    pub high_c: f64,
    pub low_c: f64,
}

/// Current conditions plus a short daily forecast, fetched fresh for every card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

pub(crate) fn display_name(name: &str, country: &str) -> String {
    if country.is_empty() {
        name.trim().to_string()
    } else {
        format!("{name}, {country}").trim().to_string()
    }
}
