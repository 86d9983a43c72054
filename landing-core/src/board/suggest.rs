//! Autocomplete state for the city search field.
//!
//! Keystrokes go through a trailing [`Debouncer`]; each fired query gets a
//! request number from [`Latest`], and results are only rendered when they
//! answer the most recently issued request.

use std::time::Duration;

use crate::{
    model::{City, CitySuggestion},
    timer::{Debouncer, Latest},
};

use super::geocoding::Geocoder;

pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(200);

/// A query that survived the debounce and should be sent to the geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    pub seq: u64,
    pub query: String,
}

impl SuggestRequest {
    pub async fn run(&self, geocoder: &dyn Geocoder, limit: usize) -> Vec<CitySuggestion> {
        geocoder.suggest(&self.query, limit).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// The list is hidden; the key is left to the input field.
    Ignored,
    /// The highlighted row moved.
    Moved(Option<usize>),
    Picked(City),
    Hidden,
}

#[derive(Debug)]
pub struct SuggestionBox {
    debounce: Debouncer<String>,
    latest: Latest,
    items: Vec<CitySuggestion>,
    visible: bool,
    active: Option<usize>,
}

impl SuggestionBox {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce: Debouncer::new(debounce),
            latest: Latest::new(),
            items: Vec::new(),
            visible: false,
            active: None,
        }
    }

    /// Record the field contents after a keystroke.
    pub fn input(&mut self, text: &str, now: Duration) {
        self.debounce.trigger(text.trim().to_string(), now);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.debounce.deadline()
    }

    /// Fire the debounce if due. An empty query hides the list instead.
    pub fn poll(&mut self, now: Duration) -> Option<SuggestRequest> {
        let ticket = self.debounce.poll(now)?;
        if ticket.value.is_empty() {
            self.latest.invalidate();
            self.hide();
            return None;
        }

        Some(SuggestRequest {
            seq: self.latest.issue(),
            query: ticket.value,
        })
    }

    /// Apply results for request `seq`. Stale responses are dropped.
    pub fn receive(&mut self, seq: u64, results: Vec<CitySuggestion>) -> bool {
        if !self.latest.is_current(seq) {
            tracing::debug!("Dropping stale suggestions for request {seq}");
            return false;
        }

        if results.is_empty() {
            self.hide();
        } else {
            self.items = results;
            self.visible = true;
            self.active = None;
        }
        true
    }

    pub fn hide(&mut self) {
        self.items.clear();
        self.visible = false;
        self.active = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[CitySuggestion] {
        &self.items
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Take the city for row `index` and close the list.
    pub fn pick(&mut self, index: usize) -> Option<City> {
        let city = self.items.get(index).map(CitySuggestion::to_city)?;
        // A late answer for an earlier keystroke must not reopen the list.
        self.latest.invalidate();
        self.debounce.cancel();
        self.hide();
        Some(city)
    }

    pub fn key(&mut self, key: Key) -> KeyOutcome {
        if !self.visible || self.items.is_empty() {
            return KeyOutcome::Ignored;
        }

        let len = self.items.len();
        match key {
            Key::Down => {
                self.active = Some(self.active.map_or(0, |i| (i + 1) % len));
                KeyOutcome::Moved(self.active)
            }
            Key::Up => {
                self.active = Some(self.active.map_or(len - 1, |i| (i + len - 1) % len));
                KeyOutcome::Moved(self.active)
            }
            Key::Enter => match self.active {
                Some(i) => self.pick(i).map_or(KeyOutcome::Ignored, KeyOutcome::Picked),
                None => KeyOutcome::Ignored,
            },
            Key::Escape => {
                self.hide();
                KeyOutcome::Hidden
            }
        }
    }
}

impl Default for SuggestionBox {
    fn default() -> Self {
        Self::new(SUGGEST_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn suggestion(name: &str) -> CitySuggestion {
        CitySuggestion {
            id: name.to_lowercase(),
            name: name.into(),
            country: "FR".into(),
            admin1: String::new(),
            lat: 1.0,
            lon: 2.0,
        }
    }

    #[test]
    fn burst_within_window_issues_single_request_for_last_text() {
        let mut sb = SuggestionBox::default();
        sb.input("p", ms(0));
        sb.input(" pa ", ms(50));

        assert_eq!(sb.poll(ms(200)), None);
        let req = sb.poll(ms(250)).expect("debounce should fire");
        assert_eq!(req.query, "pa");
        assert_eq!(sb.poll(ms(10_000)), None, "exactly one request");
    }

    #[test]
    fn stale_response_never_overwrites_newer_one() {
        let mut sb = SuggestionBox::default();
        sb.input("pa", ms(0));
        let old = sb.poll(ms(200)).unwrap();
        sb.input("par", ms(300));
        let new = sb.poll(ms(500)).unwrap();

        assert!(sb.receive(new.seq, vec![suggestion("Paris")]));
        assert!(!sb.receive(old.seq, vec![suggestion("Pau"), suggestion("Pamiers")]));
        assert_eq!(sb.items().len(), 1);
        assert_eq!(sb.items()[0].name, "Paris");
    }

    #[test]
    fn empty_query_hides_without_request() {
        let mut sb = SuggestionBox::default();
        sb.input("pa", ms(0));
        let req = sb.poll(ms(200)).unwrap();
        sb.receive(req.seq, vec![suggestion("Paris")]);
        assert!(sb.is_visible());

        sb.input("   ", ms(300));
        assert_eq!(sb.poll(ms(500)), None);
        assert!(!sb.is_visible());
    }

    #[test]
    fn empty_results_hide_list() {
        let mut sb = SuggestionBox::default();
        sb.input("zz", ms(0));
        let req = sb.poll(ms(200)).unwrap();
        assert!(sb.receive(req.seq, Vec::new()));
        assert!(!sb.is_visible());
    }

    #[test]
    fn keyboard_navigation_wraps_and_picks() {
        let mut sb = SuggestionBox::default();
        assert_eq!(sb.key(Key::Down), KeyOutcome::Ignored);

        sb.input("pa", ms(0));
        let req = sb.poll(ms(200)).unwrap();
        sb.receive(req.seq, vec![suggestion("Paris"), suggestion("Pau")]);

        assert_eq!(sb.key(Key::Up), KeyOutcome::Moved(Some(1)));
        assert_eq!(sb.key(Key::Down), KeyOutcome::Moved(Some(0)));
        assert_eq!(sb.key(Key::Down), KeyOutcome::Moved(Some(1)));

        match sb.key(Key::Enter) {
            KeyOutcome::Picked(city) => assert_eq!(city.name, "Pau, FR"),
            other => panic!("expected a pick, got {other:?}"),
        }
        assert!(!sb.is_visible());
        assert!(!sb.receive(req.seq, vec![suggestion("Paris")]));
    }

    #[test]
    fn enter_without_highlight_is_ignored_and_escape_hides() {
        let mut sb = SuggestionBox::default();
        sb.input("pa", ms(0));
        let req = sb.poll(ms(200)).unwrap();
        sb.receive(req.seq, vec![suggestion("Paris")]);

        assert_eq!(sb.key(Key::Enter), KeyOutcome::Ignored);
        assert_eq!(sb.key(Key::Escape), KeyOutcome::Hidden);
        assert!(!sb.is_visible());
    }
}
