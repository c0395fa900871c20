//! Data types for Last.fm music metadata and favourites.
//!
//! This module contains the core data structures used throughout the crate: album
//! and track metadata as returned by the API client, and the favourite tracks kept
//! by [`FavouritesStore`](crate::FavouritesStore).

use serde::{Deserialize, Serialize};
use std::fmt;

// ================================================================================================
// IMAGES
// ================================================================================================

/// One size variant of an album cover.
///
/// Serialises with Last.fm's own key names (`#text` for the URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    /// Image URL, may be empty when Last.fm has no artwork
    #[serde(rename = "#text", default)]
    pub url: String,
    /// Size label such as `small`, `medium`, `large`, `extralarge` or `mega`
    #[serde(default)]
    pub size: String,
}

/// Pick the most suitable cover URL from a list of image variants.
///
/// Prefers `large`/`extralarge`, then `medium`, then whatever comes first. Variants
/// with an empty URL are skipped. Returns an empty string when nothing usable exists.
///
/// ```rust
/// use melody_scope::{best_cover_url, Image};
///
/// let images = vec![
///     Image { url: "https://img/s.png".into(), size: "small".into() },
///     Image { url: "https://img/l.png".into(), size: "large".into() },
/// ];
/// assert_eq!(best_cover_url(&images), "https://img/l.png");
/// assert_eq!(best_cover_url(&[]), "");
/// ```
pub fn best_cover_url(images: &[Image]) -> &str {
    let usable = |img: &&Image| !img.url.is_empty();

    images
        .iter()
        .filter(usable)
        .find(|img| img.size == "large" || img.size == "extralarge")
        .or_else(|| images.iter().filter(usable).find(|img| img.size == "medium"))
        .or_else(|| images.iter().find(usable))
        .map(|img| img.url.as_str())
        .unwrap_or("")
}

/// Format a duration in seconds as `M:SS`. Missing or zero durations render as `-`.
pub fn format_duration(duration_seconds: Option<u64>) -> String {
    match duration_seconds {
        None | Some(0) => "-".to_string(),
        Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
    }
}

// ================================================================================================
// ALBUM AND TRACK METADATA
// ================================================================================================

/// An album as it appears in a listing: an artist's top albums or album search results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub name: String,
    pub artist: String,
    /// Number of plays, absent when Last.fm does not report one (search results)
    pub playcount: Option<u64>,
    pub url: String,
    pub images: Vec<Image>,
    /// Release year, only known after enrichment from album details
    pub year: Option<String>,
}

impl AlbumSummary {
    pub fn cover_url(&self) -> &str {
        best_cover_url(&self.images)
    }
}

/// Full album information as returned by `album.getinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDetails {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub images: Vec<Image>,
    /// Listener count exactly as Last.fm sent it
    pub listeners: Option<String>,
    /// Play count exactly as Last.fm sent it
    pub playcount: Option<String>,
    /// Track listing in album order
    pub tracks: Vec<TrackSummary>,
    /// Wiki summary, may contain HTML markup
    pub wiki_summary: Option<String>,
    /// Year taken from the wiki publish date
    pub year: Option<String>,
}

impl AlbumDetails {
    pub fn cover_url(&self) -> &str {
        best_cover_url(&self.images)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub duration_seconds: Option<u64>,
    pub url: String,
    pub playcount: Option<u64>,
    /// Only set for cross-artist results such as track search
    pub artist: Option<String>,
}

// ================================================================================================
// FAVOURITES
// ================================================================================================

/// A track the user has marked as a favourite.
///
/// Identity is the `(name, artist)` pair, compared exactly. The serialised form uses
/// camelCase keys so persisted favourites stay readable by other Melody Scope clients.
///
/// # Examples
///
/// ```rust
/// use melody_scope::FavouriteTrack;
///
/// let track = FavouriteTrack {
///     name: "Come Together".to_string(),
///     artist: "The Beatles".to_string(),
///     album: "Abbey Road".to_string(),
///     duration_seconds: Some(259),
///     url: "https://www.last.fm/music/The+Beatles/_/Come+Together".to_string(),
///     playcount: None,
/// };
///
/// assert!(track.matches("Come Together", "The Beatles"));
/// assert!(!track.matches("come together", "The Beatles"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteTrack {
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playcount: Option<u64>,
}

impl FavouriteTrack {
    /// Build a favourite from a track on an album page.
    ///
    /// `fetched_playcount` takes precedence over the track's own play count, which
    /// is usually missing from album listings.
    pub fn from_album_track(
        track: &TrackSummary,
        album: &AlbumDetails,
        fetched_playcount: Option<u64>,
    ) -> Self {
        Self {
            name: track.name.clone(),
            artist: track.artist.clone().unwrap_or_else(|| album.artist.clone()),
            album: album.name.clone(),
            duration_seconds: track.duration_seconds,
            url: track.url.clone(),
            playcount: fetched_playcount.or(track.playcount),
        }
    }

    /// Whether this favourite has the given identity key.
    pub fn matches(&self, name: &str, artist: &str) -> bool {
        self.name == name && self.artist == artist
    }
}

// ================================================================================================
// PAGINATION
// ================================================================================================

/// One page of an album listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumPage {
    /// The albums on this page
    pub albums: Vec<AlbumSummary>,
    /// Current page number (1-indexed)
    pub page_number: u32,
    /// Whether there are more pages available
    pub has_next_page: bool,
    /// Total number of pages
    pub total_pages: u32,
}

// ================================================================================================
// DISPLAY
// ================================================================================================

impl fmt::Display for AlbumSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.name)
    }
}

impl fmt::Display for AlbumDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.year {
            Some(year) => write!(f, "{} - {} ({year})", self.artist, self.name),
            None => write!(f, "{} - {}", self.artist, self.name),
        }
    }
}

impl fmt::Display for TrackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{artist} - {}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for FavouriteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} [{}]", self.artist, self.name, self.album)
    }
}
