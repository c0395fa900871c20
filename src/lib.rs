//! # melody-scope
//!
//! Browse an artist's albums, album and track details and search results through
//! the Last.fm JSON API, and keep a persisted list of favourite tracks.
//!
//! ```rust,no_run
//! use melody_scope::{ClientConfig, FavouritesStore, FileStorage, MelodyScopeApi, MelodyScopeClient};
//!
//! #[tokio::main]
//! async fn main() -> melody_scope::Result<()> {
//!     let client = MelodyScopeClient::new(
//!         Box::new(http_client::native::NativeClient::new()),
//!         ClientConfig::from_env(),
//!     );
//!     let store = FavouritesStore::load(FileStorage::new()?);
//!
//!     for album in client.fetch_artist_top_albums(store.artist()).await? {
//!         println!("{album}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod favourites;
pub mod normalize;
pub mod playcounts;
pub mod r#trait;
pub mod types;

pub use catalog::{paginate, sort_albums, AlbumSort, ITEMS_PER_PAGE};
pub use client::MelodyScopeClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, MelodyScopeError};
pub use favourites::{
    FavouritesStore, FileStorage, MemoryStorage, PersistedEnvelope, PersistedState,
    SharedFavourites, StateStorage,
};
pub use playcounts::{fetch_album_years, fetch_track_playcounts, top_tracks_by_playcount};
pub use r#trait::MelodyScopeApi;
pub use types::{
    best_cover_url, format_duration, AlbumDetails, AlbumPage, AlbumSummary, FavouriteTrack,
    Image, TrackSummary,
};

#[cfg(feature = "mock")]
pub use r#trait::MockMelodyScopeApi;

pub type Result<T> = std::result::Result<T, MelodyScopeError>;
