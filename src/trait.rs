use crate::types::{AlbumDetails, AlbumSummary, TrackSummary};
use crate::Result;
use async_trait::async_trait;

/// Trait for Melody Scope's Last.fm operations that can be mocked for testing.
///
/// The helpers in [`playcounts`](crate::playcounts) and the command-line binary are
/// written against this trait rather than against [`MelodyScopeClient`](crate::MelodyScopeClient),
/// so they can be driven by a mock in tests.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockMelodyScopeApi`
/// that implements this trait using the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait MelodyScopeApi {
    /// Fetch an artist's top albums.
    ///
    /// Fails with a validation error, without touching the network, if `artist` is
    /// blank after trimming. An artist with no albums yields an empty list.
    async fn fetch_artist_top_albums(&self, artist: &str) -> Result<Vec<AlbumSummary>>;

    /// Fetch full album information including the track listing.
    ///
    /// Returns `Ok(None)` when Last.fm has no matching album. Fails with a validation
    /// error if either argument is blank after trimming.
    async fn fetch_album_details(&self, artist: &str, album: &str) -> Result<Option<AlbumDetails>>;

    /// Search tracks across all artists.
    ///
    /// A blank query returns an empty list without a network call.
    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackSummary>>;

    /// Search albums across all artists.
    ///
    /// A blank query returns an empty list without a network call.
    async fn search_albums(&self, query: &str) -> Result<Vec<AlbumSummary>>;

    /// Look up a single track's play count.
    ///
    /// Best effort: network failures, API errors and missing fields all yield `None`.
    /// This is called for many tracks at once and one failure must not sink the batch.
    async fn fetch_track_info(&self, artist: &str, track: &str) -> Option<u64>;
}
