use std::collections::BTreeSet;

use crate::deck::Direction;
use crate::store::Result;
use crate::store::kv::KeyValueStore;

pub const LEARNED_ENTRY: &str = "fiszki_learned_v1";
pub const DIRECTION_ENTRY: &str = "fiszki_direction_v1";

/// Names the browser version stored progress under. Read only while the
/// current entries are absent; the next write replaces them.
const LEGACY_LEARNED_ENTRY: &str = "web_fiszki_learned_v1";
const LEGACY_DIRECTION_ENTRY: &str = "web_fiszki_direction_v1";

pub type LearnedSet = BTreeSet<String>;

/// Learned card keys and study direction, mirrored to a [`KeyValueStore`].
///
/// Every mutation writes through before returning, so an abrupt exit loses at
/// most the operation in flight. Write failures are returned but the in-memory
/// state is already updated and stays authoritative for the session.
pub struct ProgressStore {
    kv: Box<dyn KeyValueStore>,
    learned: LearnedSet,
    direction: Direction,
}

impl ProgressStore {
    pub fn open(kv: Box<dyn KeyValueStore>) -> Self {
        let (learned, direction) = read_entries(kv.as_ref());
        Self {
            kv,
            learned,
            direction,
        }
    }

    /// Re-reads both entries from the medium. Absent or malformed values fall
    /// back to an empty set and the default direction.
    pub fn load(&mut self) -> (LearnedSet, Direction) {
        let (learned, direction) = read_entries(self.kv.as_ref());
        self.learned = learned.clone();
        self.direction = direction;
        (learned, direction)
    }

    pub fn save(&mut self, learned: &LearnedSet, direction: Direction) -> Result<()> {
        self.learned = learned.clone();
        self.direction = direction;
        self.flush()
    }

    /// Adds a key and persists. Returns whether the key was new.
    pub fn mark_learned(&mut self, key: &str) -> Result<bool> {
        let inserted = self.learned.insert(key.to_string());
        self.flush()?;
        Ok(inserted)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.learned.clear();
        self.flush()
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.direction = direction;
        self.kv.set(DIRECTION_ENTRY, direction.as_tag())
    }

    pub fn learned(&self) -> &LearnedSet {
        &self.learned
    }

    pub fn is_learned(&self, key: &str) -> bool {
        self.learned.contains(key)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    fn flush(&mut self) -> Result<()> {
        let keys: Vec<&String> = self.learned.iter().collect();
        let json = serde_json::to_string(&keys)?;
        self.kv.set(DIRECTION_ENTRY, self.direction.as_tag())?;
        self.kv.set(LEARNED_ENTRY, &json)?;
        log::debug!("saved progress: {} learned keys", self.learned.len());
        Ok(())
    }
}

fn entry(kv: &dyn KeyValueStore, name: &str, legacy: &str) -> Option<String> {
    kv.get(name).or_else(|| {
        let value = kv.get(legacy)?;
        log::info!("reading progress from legacy entry {legacy}");
        Some(value)
    })
}

fn read_entries(kv: &dyn KeyValueStore) -> (LearnedSet, Direction) {
    let learned = match entry(kv, LEARNED_ENTRY, LEGACY_LEARNED_ENTRY) {
        Some(raw) => serde_json::from_str::<Vec<String>>(&raw)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_else(|e| {
                log::warn!("ignoring unreadable learned set: {e}");
                LearnedSet::new()
            }),
        None => LearnedSet::new(),
    };
    let direction = entry(kv, DIRECTION_ENTRY, LEGACY_DIRECTION_ENTRY)
        .and_then(|tag| Direction::from_tag(&tag))
        .unwrap_or_default();
    (learned, direction)
}
