//! Pure card view models. Nothing here performs I/O, so a board's visible
//! state can be computed and tested without a terminal or a network.

use chrono::NaiveDateTime;

use crate::model::{City, CitySuggestion, DailyForecast, WeatherSnapshot};

pub const LOCATION_FAILED: &str = "Failed to load weather";
pub const LOCATION_DENIED: &str = "Location permission denied";

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Map a WMO weather code to an icon key, falling back to "few clouds".
pub fn icon_key(code: i32) -> &'static str {
    match code {
        0 => "01d",
        1 => "02d",
        2 => "03d",
        3 => "04d",
        45 | 48 => "50d",
        51 | 53 | 55 => "09d",
        61 | 63 | 65 => "10d",
        71 | 73 | 75 => "13d",
        80 | 81 | 82 => "09d",
        95 | 96 | 99 => "11d",
        _ => "02d",
    }
}

pub fn icon_url(code: i32) -> String {
    format!("{ICON_BASE}/{}@2x.png", icon_key(code))
}

/// Error card text for a failed city addition.
pub fn city_failed(city_name: &str) -> String {
    format!("Failed to load weather for {city_name}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDayView {
    pub weekday: String,
    pub icon_url: String,
    pub range: String,
}

impl From<&DailyForecast> for ForecastDayView {
    fn from(day: &DailyForecast) -> Self {
        Self {
            weekday: day.date.format("%a").to_string(),
            icon_url: icon_url(day.code),
            range: format!("{}° / {}°", round(day.low_c), round(day.high_c)),
        }
    }
}

/// Everything a populated card displays.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: String,
    pub subtitle: String,
    pub icon_url: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    pub forecast: Vec<ForecastDayView>,
}

impl CardView {
    pub fn build(city: &City, snapshot: &WeatherSnapshot, observed_at: NaiveDateTime) -> Self {
        let stamp = observed_at.format("%Y-%m-%d %H:%M").to_string();
        let subtitle = match &city.place_name {
            Some(place) => format!("{place} · {stamp}"),
            None => stamp,
        };

        let current = &snapshot.current;
        Self {
            title: city.name.clone(),
            subtitle,
            icon_url: icon_url(current.code),
            temperature: format!("{}°C", round(current.temperature_c)),
            humidity: format!("Humidity: {}%", current.humidity_pct),
            wind: format!("Wind: {} km/h", round(current.wind_speed_kmh)),
            forecast: snapshot.forecast.iter().map(ForecastDayView::from).collect(),
        }
    }
}

/// Primary and secondary text of one autocomplete row.
pub fn suggestion_label(s: &CitySuggestion) -> (String, String) {
    (s.label(), s.admin1.clone())
}

// `Math.round` semantics: halves round towards positive infinity.
fn round(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrentConditions;
    use chrono::NaiveDate;

    fn snapshot() -> WeatherSnapshot {
        let day = |d: u32, code: i32, hi: f64, lo: f64| DailyForecast {
            date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
            code,
            high_c: hi,
            low_c: lo,
        };
        WeatherSnapshot {
            current: CurrentConditions {
                temperature_c: 14.5,
                humidity_pct: 71,
                wind_speed_kmh: 12.4,
                code: 61,
            },
            forecast: vec![day(17, 3, 16.2, 9.1), day(18, 95, 13.9, -0.5), day(19, 7, 18.0, 7.7)],
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn icon_table_and_fallback() {
        assert_eq!(icon_key(0), "01d");
        assert_eq!(icon_key(48), "50d");
        assert_eq!(icon_key(82), "09d");
        assert_eq!(icon_key(99), "11d");
        assert_eq!(icon_key(56), "02d");
        assert_eq!(icon_url(3), "https://openweathermap.org/img/wn/04d@2x.png");
    }

    #[test]
    fn card_for_searched_city() {
        let city = City::new("1", "Paris, FR", 48.85, 2.35);
        let view = CardView::build(&city, &snapshot(), noon());

        assert_eq!(view.title, "Paris, FR");
        assert_eq!(view.subtitle, "2026-10-17 12:30");
        assert_eq!(view.icon_url, icon_url(61));
        assert_eq!(view.temperature, "15°C");
        assert_eq!(view.humidity, "Humidity: 71%");
        assert_eq!(view.wind, "Wind: 12 km/h");

        let days: Vec<_> = view.forecast.iter().map(|d| d.weekday.as_str()).collect();
        assert_eq!(days, ["Sat", "Sun", "Mon"]);
        assert_eq!(view.forecast[0].range, "9° / 16°");
        assert_eq!(view.forecast[1].range, "0° / 14°");
        assert_eq!(view.forecast[2].icon_url, icon_url(1), "unknown codes fall back");
    }

    #[test]
    fn place_name_prefixes_subtitle() {
        let city = City::new("x", "My Location", 45.7, 4.8).with_place_name("Lyon, France");
        let view = CardView::build(&city, &snapshot(), noon());
        assert_eq!(view.subtitle, "Lyon, France · 2026-10-17 12:30");
    }

    #[test]
    fn error_texts() {
        assert_eq!(city_failed("Oslo, NO"), "Failed to load weather for Oslo, NO");
    }
}
