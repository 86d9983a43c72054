//! Core library for the `landing` widgets.
//!
//! This crate defines:
//! - The city weather board (geocoding, forecasts, recent cities, cards)
//! - The infinite carousel (slide ring and scroll coordination)
//! - Logical-time helpers shared by both
//! - Configuration and local persistence
//!
//! It is used by `landing-cli`, but has no terminal dependencies and can be
//! driven by any front end that supplies storage, a location source and a
//! scroll surface.

pub mod board;
pub mod carousel;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod timer;

pub use board::{
    board_from_config,
    controller::{
        Board, Card, CardId, CardState, LoadedCard, LoadedLocation, LocationOutcome, PendingCard,
        PendingLocation,
    },
    forecast::{OpenMeteoForecast, WeatherClient},
    geocoding::{Geocoder, OpenMeteoGeocoder},
    location::{FixedLocation, LocationSource},
    recent::RecentCitiesStore,
    render::CardView,
    suggest::SuggestionBox,
};
pub use config::Config;
pub use error::BoardError;
pub use model::{City, CitySuggestion, Position, WeatherSnapshot};
pub use store::{FileStore, KeyValueStore, MemoryStore};
