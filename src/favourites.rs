//! Persisted favourites and the last selected artist.
//!
//! State lives in memory in a [`FavouritesStore`] and is written through a
//! [`StateStorage`] backend on every mutation. Storage is a flat key/value space of
//! JSON strings; the store uses a single key, [`STORAGE_KEY`], holding the envelope
//! `{"state": {"favourites": [...], "artist": "..."}, "version": 0}`.

use crate::types::FavouriteTrack;
use crate::{MelodyScopeError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Key the favourites envelope is stored under.
pub const STORAGE_KEY: &str = "melody-scope-storage";

/// Version written into the envelope.
pub const STATE_VERSION: u32 = 0;

/// Artist selected when nothing has been persisted yet.
pub const DEFAULT_ARTIST: &str = "The Beatles";

// ================================================================================================
// STORAGE BACKENDS
// ================================================================================================

/// Key/value storage for persisted state.
pub trait StateStorage {
    /// Read the value stored under `key`, `None` if nothing is stored.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// File-backed storage: one JSON file per key.
///
/// By default files live under the XDG data directory, e.g.
/// `~/.local/share/melody-scope/melody-scope-storage.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted in the platform data directory.
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            MelodyScopeError::Storage("Cannot determine XDG data directory".to_string())
        })?;
        Ok(Self::in_dir(data_dir.join("melody-scope")))
    }

    /// Storage rooted in an explicit directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path)?;
        log::debug!("State loaded from: {}", path.display());
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling and rename so a crash never leaves a truncated file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        log::debug!("State saved to: {}", path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
            log::debug!("State removed from: {}", path.display());
        }
        Ok(())
    }
}

/// In-process storage, for tests and embedders that persist state themselves.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| MelodyScopeError::Storage("memory storage lock poisoned".to_string()))
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

// ================================================================================================
// PERSISTED SHAPE
// ================================================================================================

/// The persisted part of the store.
///
/// Missing fields take their defaults and unreadable favourite entries are dropped,
/// so a partly valid state keeps whatever can still be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    #[serde(deserialize_with = "readable_favourites")]
    pub favourites: Vec<FavouriteTrack>,
    pub artist: String,
}

fn readable_favourites<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<FavouriteTrack>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(track) => Some(track),
            Err(e) => {
                log::warn!("Dropping unreadable favourite: {e}");
                None
            }
        })
        .collect())
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            favourites: Vec::new(),
            artist: DEFAULT_ARTIST.to_string(),
        }
    }
}

/// Versioned wrapper written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub state: PersistedState,
    pub version: u32,
}

impl PersistedEnvelope {
    pub fn new(state: PersistedState) -> Self {
        Self {
            state,
            version: STATE_VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ================================================================================================
// STORE
// ================================================================================================

/// Favourite tracks plus the currently selected artist.
///
/// Favourites keep insertion order and are unique by `(name, artist)`, compared
/// exactly. Every mutation writes the full state through the storage backend before
/// returning; the in-memory change is kept even when that write fails.
///
/// # Examples
///
/// ```rust
/// use melody_scope::{FavouriteTrack, FavouritesStore, MemoryStorage};
///
/// let mut store = FavouritesStore::load(MemoryStorage::new());
/// let track = FavouriteTrack {
///     name: "Come Together".to_string(),
///     artist: "The Beatles".to_string(),
///     album: "Abbey Road".to_string(),
///     duration_seconds: Some(259),
///     url: "https://www.last.fm/music/The+Beatles/_/Come+Together".to_string(),
///     playcount: None,
/// };
///
/// store.add_favourite(track.clone())?;
/// store.add_favourite(track)?;
/// assert_eq!(store.favourites().len(), 1);
/// assert!(store.is_favourite("Come Together", "The Beatles"));
/// # Ok::<(), melody_scope::MelodyScopeError>(())
/// ```
pub struct FavouritesStore<S: StateStorage> {
    storage: S,
    state: PersistedState,
}

impl<S: StateStorage> FavouritesStore<S> {
    /// Rehydrate from storage, falling back to defaults when nothing usable is stored.
    pub fn load(storage: S) -> Self {
        let state = match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => match PersistedEnvelope::from_json(&json) {
                Ok(envelope) => envelope.state,
                Err(e) => {
                    log::warn!("Ignoring malformed favourites state: {e}");
                    PersistedState::default()
                }
            },
            Ok(None) => PersistedState::default(),
            Err(e) => {
                log::warn!("Could not read favourites state: {e}");
                PersistedState::default()
            }
        };

        log::debug!(
            "Loaded {} favourites, artist '{}'",
            state.favourites.len(),
            state.artist
        );
        Self { storage, state }
    }

    pub fn favourites(&self) -> &[FavouriteTrack] {
        &self.state.favourites
    }

    pub fn artist(&self) -> &str {
        &self.state.artist
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a favourite unless one with the same name and artist exists.
    pub fn add_favourite(&mut self, track: FavouriteTrack) -> Result<()> {
        if self.is_favourite(&track.name, &track.artist) {
            return Ok(());
        }

        log::debug!("Adding favourite {track}");
        self.state.favourites.push(track);
        self.persist()
    }

    /// Remove the favourite with exactly this name and artist, if any.
    pub fn remove_favourite(&mut self, name: &str, artist: &str) -> Result<()> {
        let before = self.state.favourites.len();
        self.state.favourites.retain(|f| !f.matches(name, artist));

        if self.state.favourites.len() == before {
            return Ok(());
        }
        log::debug!("Removed favourite '{name}' by '{artist}'");
        self.persist()
    }

    pub fn is_favourite(&self, name: &str, artist: &str) -> bool {
        self.state.favourites.iter().any(|f| f.matches(name, artist))
    }

    /// Replace the selected artist. No validation is done.
    pub fn set_artist(&mut self, artist: impl Into<String>) -> Result<()> {
        self.state.artist = artist.into();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let json = PersistedEnvelope::new(self.state.clone()).to_json()?;
        self.storage.set_item(STORAGE_KEY, &json)
    }
}

/// A [`FavouritesStore`] that can be shared between threads.
///
/// Each operation holds the lock for its whole read-modify-write, so concurrent
/// `add_favourite` calls can never insert the same key twice.
pub struct SharedFavourites<S: StateStorage> {
    inner: Arc<Mutex<FavouritesStore<S>>>,
}

impl<S: StateStorage> Clone for SharedFavourites<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StateStorage> SharedFavourites<S> {
    pub fn new(store: FavouritesStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with<T>(&self, f: impl FnOnce(&mut FavouritesStore<S>) -> T) -> Result<T> {
        let mut store = self
            .inner
            .lock()
            .map_err(|_| MelodyScopeError::Storage("favourites lock poisoned".to_string()))?;
        Ok(f(&mut store))
    }

    pub fn add_favourite(&self, track: FavouriteTrack) -> Result<()> {
        self.with(|store| store.add_favourite(track))?
    }

    pub fn remove_favourite(&self, name: &str, artist: &str) -> Result<()> {
        self.with(|store| store.remove_favourite(name, artist))?
    }

    pub fn is_favourite(&self, name: &str, artist: &str) -> Result<bool> {
        self.with(|store| store.is_favourite(name, artist))
    }

    pub fn set_artist(&self, artist: impl Into<String>) -> Result<()> {
        let artist = artist.into();
        self.with(|store| store.set_artist(artist))?
    }

    pub fn favourites(&self) -> Result<Vec<FavouriteTrack>> {
        self.with(|store| store.favourites().to_vec())
    }

    pub fn artist(&self) -> Result<String> {
        self.with(|store| store.artist().to_string())
    }
}
