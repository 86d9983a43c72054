use crate::{error::BoardError, model::City, store::KeyValueStore};

/// Storage key holding the JSON array of recent cities.
pub const RECENT_KEY: &str = "weather_recent_cities_v1";

/// Maximum number of cities kept in the recent list.
pub const RECENT_CAP: usize = 8;

/// Most-recent-first list of cities the user has looked at.
#[derive(Debug)]
pub struct RecentCitiesStore {
    store: Box<dyn KeyValueStore>,
}

impl RecentCitiesStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted list. Missing or corrupt data yields an empty list.
    pub fn load(&self) -> Vec<City> {
        match self.try_load() {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!("Ignoring recent cities: {err}");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<City>, BoardError> {
        let raw = self
            .store
            .get(RECENT_KEY)
            .map_err(|e| BoardError::StorageCorrupt(format!("{e:#}")))?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        // `null` was a valid stored value for an empty list.
        let parsed: Option<Vec<City>> =
            serde_json::from_str(&raw).map_err(|e| BoardError::StorageCorrupt(e.to_string()))?;

        Ok(parsed.unwrap_or_default())
    }

    /// Persist the first [`RECENT_CAP`] entries of `list`.
    pub fn save(&mut self, list: &[City]) -> anyhow::Result<()> {
        let kept = &list[..list.len().min(RECENT_CAP)];
        let json = serde_json::to_string(kept)?;
        self.store.set(RECENT_KEY, json)
    }

    /// Move `city` to the front (dropping any entry with the same id) and persist.
    ///
    /// Returns the updated list so callers can re-render the chips. A failed
    /// write is logged; the returned list still reflects the addition.
    pub fn add(&mut self, city: City) -> Vec<City> {
        let previous = self.load();
        let mut next = Vec::with_capacity(RECENT_CAP);
        let id = city.id.clone();
        next.push(city);
        next.extend(previous.into_iter().filter(|c| c.id != id));
        next.truncate(RECENT_CAP);

        if let Err(err) = self.save(&next) {
            tracing::warn!("Failed to persist recent cities: {err:#}");
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use anyhow::anyhow;

    fn city(id: &str) -> City {
        City::new(id, format!("City {id}"), 1.0, 2.0)
    }

    fn ids(list: &[City]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn load_is_empty_without_stored_value() {
        let store = RecentCitiesStore::new(Box::new(MemoryStore::new()));
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_is_empty_for_corrupt_values() {
        for raw in ["{not json", "42", "{\"id\":\"1\"}", "[{\"id\":1}]", "null", ""] {
            let store =
                RecentCitiesStore::new(Box::new(MemoryStore::new().with_entry(RECENT_KEY, raw)));
            assert!(store.load().is_empty(), "value {raw:?} should load as empty");
        }
    }

    #[test]
    fn add_same_id_twice_keeps_one_entry_first() {
        let mut store = RecentCitiesStore::new(Box::new(MemoryStore::new()));
        store.add(city("a"));
        store.add(city("b"));
        let list = store.add(city("a"));

        assert_eq!(ids(&list), ["a", "b"]);
        assert_eq!(ids(&store.load()), ["a", "b"]);
    }

    #[test]
    fn list_never_exceeds_cap() {
        let mut store = RecentCitiesStore::new(Box::new(MemoryStore::new()));
        for i in 0..20 {
            let list = store.add(city(&i.to_string()));
            assert!(list.len() <= RECENT_CAP);
            assert!(store.load().len() <= RECENT_CAP);
        }
        assert_eq!(ids(&store.load()), ["19", "18", "17", "16", "15", "14", "13", "12"]);
    }

    #[test]
    fn save_truncates_long_lists() {
        let mut store = RecentCitiesStore::new(Box::new(MemoryStore::new()));
        let list: Vec<City> = (0..12).map(|i| city(&i.to_string())).collect();
        store.save(&list).unwrap();
        assert_eq!(store.load().len(), RECENT_CAP);
        assert_eq!(store.load()[0].id, "0");
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn set(&mut self, _key: &str, _value: String) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn failing_backend_is_best_effort() {
        let mut store = RecentCitiesStore::new(Box::new(BrokenStore));
        assert!(store.load().is_empty());
        let list = store.add(city("a"));
        assert_eq!(ids(&list), ["a"]);
    }
}
