use chrono::Local;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::task::JoinSet;

use crate::{
    error::BoardError,
    model::{City, MY_LOCATION, WeatherSnapshot},
};

use super::{
    forecast::WeatherClient,
    geocoding::Geocoder,
    location::LocationSource,
    recent::RecentCitiesStore,
    render::{CardView, LOCATION_DENIED, LOCATION_FAILED, city_failed},
};

/// How long a location card waits for a place name before giving up on it.
pub const REVERSE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u64);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardState {
    /// Placeholder while the weather request is in flight.
    Skeleton,
    Populated(CardView),
    /// Terminal: the request failed. Carries the message shown on the card.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    /// Unknown for location cards until the position resolves.
    pub city: Option<City>,
    pub state: CardState,
}

impl Card {
    pub fn is_skeleton(&self) -> bool {
        matches!(self.state, CardState::Skeleton)
    }
}

/// Cards addressed by id, in display order (front first).
#[derive(Debug, Default)]
struct Deck {
    order: Vec<CardId>,
    cards: HashMap<CardId, Card>,
    next_id: u64,
}

impl Deck {
    fn push_skeleton(&mut self, city: Option<City>) -> CardId {
        self.next_id += 1;
        let id = CardId(self.next_id);
        self.order.insert(0, id);
        self.cards.insert(
            id,
            Card {
                id,
                city,
                state: CardState::Skeleton,
            },
        );
        id
    }

    /// Swap a card's state. A card removed in the meantime stays removed.
    fn settle(&mut self, id: CardId, city: Option<City>, state: CardState) -> bool {
        let Some(card) = self.cards.get_mut(&id) else {
            tracing::debug!("Card {id} was removed before it settled");
            return false;
        };
        if city.is_some() {
            card.city = city;
        }
        card.state = state;
        true
    }

    fn remove(&mut self, id: CardId) -> bool {
        self.order.retain(|c| *c != id);
        self.cards.remove(&id).is_some()
    }

    fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }
}

/// A card whose skeleton is already on the board and whose weather is still
/// to be fetched.
///
/// It owns everything the request needs, so the board can be read and cards
/// removed while [`PendingCard::load`] runs. Hand the result back with
/// [`Board::complete`].
#[derive(Debug)]
pub struct PendingCard {
    pub id: CardId,
    pub city: City,
    weather: Arc<dyn WeatherClient>,
}

impl PendingCard {
    pub async fn load(self) -> LoadedCard {
        let result = self.weather.fetch(self.city.lat, self.city.lon).await;
        LoadedCard {
            id: self.id,
            city: self.city,
            result,
        }
    }
}

#[derive(Debug)]
pub struct LoadedCard {
    pub id: CardId,
    pub city: City,
    pub result: Result<WeatherSnapshot, BoardError>,
}

/// Skeleton of a location card, detached from the board like [`PendingCard`].
#[derive(Debug)]
pub struct PendingLocation {
    pub id: CardId,
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherClient>,
    reverse_timeout: Duration,
}

impl PendingLocation {
    /// Ask `source` for the position, then fetch weather and the place name
    /// concurrently. A failed or slow reverse lookup only costs the place name.
    pub async fn load(self, source: &dyn LocationSource) -> LoadedLocation {
        let pos = match source.current_position().await {
            Ok(pos) => pos,
            Err(BoardError::PermissionDenied) => {
                return LoadedLocation {
                    id: self.id,
                    outcome: LocationOutcome::Denied,
                };
            }
            Err(err) => {
                return LoadedLocation {
                    id: self.id,
                    outcome: LocationOutcome::Unavailable(err),
                };
            }
        };

        let reverse = tokio::time::timeout(
            self.reverse_timeout,
            self.geocoder.resolve_by_coordinates(pos.lat, pos.lon),
        );
        let (weather, place) = tokio::join!(self.weather.fetch(pos.lat, pos.lon), reverse);

        let place = match place {
            Ok(Ok(place)) => place,
            Ok(Err(err)) => {
                tracing::debug!("Reverse geocoding failed: {err}");
                None
            }
            Err(_) => {
                tracing::debug!("Reverse geocoding timed out after {:?}", self.reverse_timeout);
                None
            }
        };

        let city = match place {
            Some(place) => City::new(place.id, MY_LOCATION, pos.lat, pos.lon)
                .with_place_name(place.name),
            None => City::new(
                City::coordinate_id(pos.lat, pos.lon),
                MY_LOCATION,
                pos.lat,
                pos.lon,
            ),
        };

        LoadedLocation {
            id: self.id,
            outcome: LocationOutcome::Located { city, weather },
        }
    }
}

#[derive(Debug)]
pub enum LocationOutcome {
    Denied,
    /// The source failed for a reason other than a refused permission.
    Unavailable(BoardError),
    Located {
        city: City,
        weather: Result<WeatherSnapshot, BoardError>,
    },
}

#[derive(Debug)]
pub struct LoadedLocation {
    pub id: CardId,
    pub outcome: LocationOutcome,
}

/// Owns the card list and the recent-cities store, and drives each card
/// from skeleton to populated or failed.
#[derive(Debug)]
pub struct Board {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherClient>,
    recent: RecentCitiesStore,
    deck: Deck,
    reverse_timeout: Duration,
}

impl Board {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherClient>,
        recent: RecentCitiesStore,
    ) -> Self {
        Self {
            geocoder,
            weather,
            recent,
            deck: Deck::default(),
            reverse_timeout: REVERSE_TIMEOUT,
        }
    }

    pub fn with_reverse_timeout(mut self, timeout: Duration) -> Self {
        self.reverse_timeout = timeout;
        self
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    /// Cards in display order, newest first.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.deck.iter()
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.cards.get(&id)
    }

    pub fn len(&self) -> usize {
        self.deck.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.order.is_empty()
    }

    /// Recent cities for the chip row.
    pub fn recent(&self) -> Vec<City> {
        self.recent.load()
    }

    /// Remove a card in any state. Recent cities are left untouched.
    pub fn remove(&mut self, id: CardId) -> bool {
        self.deck.remove(id)
    }

    /// Put a skeleton for `city` at the front, optionally remembering the city
    /// as recent. No I/O happens here.
    pub fn begin_city(&mut self, city: City, remember: bool) -> PendingCard {
        if remember {
            self.recent.add(city.clone());
        }
        let id = self.deck.push_skeleton(Some(city.clone()));
        PendingCard {
            id,
            city,
            weather: Arc::clone(&self.weather),
        }
    }

    /// Swap a skeleton for its populated or failed card. Returns `false` when
    /// the card was removed while loading.
    pub fn complete(&mut self, loaded: LoadedCard) -> bool {
        let LoadedCard { id, city, result } = loaded;
        let state = match result {
            Ok(snapshot) => {
                tracing::info!("Loaded weather for {}", city.name);
                CardState::Populated(CardView::build(&city, &snapshot, Local::now().naive_local()))
            }
            Err(err) => {
                tracing::error!("Weather for {} failed: {err}", city.name);
                CardState::Failed(city_failed(&city.name))
            }
        };
        self.deck.settle(id, None, state)
    }

    /// Show a card for `city`, optionally remembering it as recent.
    pub async fn add_city(&mut self, city: City, remember: bool) -> CardId {
        let pending = self.begin_city(city, remember);
        let id = pending.id;
        let loaded = pending.load().await;
        self.complete(loaded);
        id
    }

    /// Show cards for several cities at once. All skeletons appear before any
    /// request completes; requests run concurrently and settle independently.
    pub async fn add_cities(&mut self, cities: Vec<City>, remember: bool) -> Vec<CardId> {
        let mut tasks = JoinSet::new();
        let mut ids = Vec::with_capacity(cities.len());

        for city in cities {
            let pending = self.begin_city(city, remember);
            ids.push(pending.id);
            tasks.spawn(pending.load());
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(loaded) => {
                    self.complete(loaded);
                }
                Err(err) => tracing::error!("Weather task aborted: {err}"),
            }
        }

        // An aborted task must not leave its skeleton behind.
        for id in &ids {
            let stuck = self.deck.cards.get(id).filter(|c| c.is_skeleton()).cloned();
            if let Some(card) = stuck {
                let name = card.city.map(|c| c.name).unwrap_or_default();
                self.deck.settle(*id, None, CardState::Failed(city_failed(&name)));
            }
        }

        ids
    }

    /// Resolve a typed query and show its card. An empty query does nothing.
    ///
    /// Resolution failures are returned to the caller and create no card.
    pub async fn add_by_name(&mut self, query: &str) -> Result<Option<CardId>, BoardError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let city = self.geocoder.resolve_by_name(query).await?;
        Ok(Some(self.add_city(city, true).await))
    }

    /// Put a skeleton for the device position at the front. The city is only
    /// known once the pending lookup has run.
    pub fn begin_current_location(&mut self) -> PendingLocation {
        PendingLocation {
            id: self.deck.push_skeleton(None),
            geocoder: Arc::clone(&self.geocoder),
            weather: Arc::clone(&self.weather),
            reverse_timeout: self.reverse_timeout,
        }
    }

    /// Settle a location card. The city is remembered whenever its weather
    /// loaded, even if the card was removed meanwhile.
    pub fn complete_location(&mut self, loaded: LoadedLocation) -> bool {
        let LoadedLocation { id, outcome } = loaded;
        match outcome {
            LocationOutcome::Denied => {
                self.deck.settle(id, None, CardState::Failed(LOCATION_DENIED.into()))
            }
            LocationOutcome::Unavailable(err) => {
                tracing::warn!("Location lookup failed: {err}");
                self.deck.settle(id, None, CardState::Failed(LOCATION_FAILED.into()))
            }
            LocationOutcome::Located {
                city,
                weather: Ok(snapshot),
            } => {
                self.recent.add(city.clone());
                let view = CardView::build(&city, &snapshot, Local::now().naive_local());
                tracing::info!("Loaded weather for current location {}", city.id);
                self.deck.settle(id, Some(city), CardState::Populated(view))
            }
            LocationOutcome::Located {
                city,
                weather: Err(err),
            } => {
                tracing::error!("Weather for current location failed: {err}");
                self.deck.settle(id, Some(city), CardState::Failed(LOCATION_FAILED.into()))
            }
        }
    }

    /// Show a card for the device position.
    pub async fn add_current_location(&mut self, source: &dyn LocationSource) -> CardId {
        let pending = self.begin_current_location();
        let id = pending.id;
        let loaded = pending.load(source).await;
        self.complete_location(loaded);
        id
    }

    /// Load the showcase cities without recording them as recent.
    pub async fn preload_famous(&mut self) -> Vec<CardId> {
        self.add_cities(famous_cities(), false).await
    }
}

/// Showcase cities loaded on start-up.
pub fn famous_cities() -> Vec<City> {
    [
        ("nyc", "New York, US", 40.7128, -74.0060),
        ("lon", "London, UK", 51.5072, -0.1276),
        ("par", "Paris, FR", 48.8566, 2.3522),
        ("ber", "Berlin, DE", 52.5200, 13.4050),
        ("tok", "Tokyo, JP", 35.6762, 139.6503),
        ("dub", "Dubai, AE", 25.2048, 55.2708),
        ("syd", "Sydney, AU", -33.8688, 151.2093),
        ("ist", "Istanbul, TR", 41.0082, 28.9784),
        ("mos", "Moscow, RU", 55.7558, 37.6173),
    ]
    .into_iter()
    .map(|(id, name, lat, lon)| City::new(id, name, lat, lon))
    .collect()
}
