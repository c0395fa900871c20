//! Concurrent enrichment of album and track listings.
//!
//! Album listings from Last.fm lack per-track play counts and release years. These
//! helpers issue the follow-up lookups for a listing all at once and collect
//! whatever comes back. Lookups run concurrently on the calling task, not on spawned
//! tasks, and a failed lookup simply leaves its entry empty.

use crate::types::{AlbumSummary, TrackSummary};
use crate::MelodyScopeApi;
use futures::future::join_all;
use std::collections::BTreeMap;

/// How many tracks of an album get an individual play count lookup.
pub const MAX_TRACKS_TO_FETCH_PLAYCOUNTS: usize = 20;

/// How many albums of a listing get a details lookup for their year.
pub const MAX_ALBUMS_TO_FETCH_YEARS: usize = 20;

/// How many rows the play count chart shows.
pub const MAX_TRACKS_FOR_GRAPH: usize = 10;

/// Fetch play counts for the first `limit` tracks of an album concurrently.
///
/// The returned map is keyed by each track's index in `tracks`. Tracks whose lookup
/// failed or reported no play count are absent from the map.
pub async fn fetch_track_playcounts<A>(
    api: &A,
    artist: &str,
    tracks: &[TrackSummary],
    limit: usize,
) -> BTreeMap<usize, u64>
where
    A: MelodyScopeApi + ?Sized,
{
    let lookups = tracks
        .iter()
        .take(limit)
        .enumerate()
        .filter(|(_, track)| !artist.is_empty() && !track.name.is_empty())
        .map(|(index, track)| async move {
            (index, api.fetch_track_info(artist, &track.name).await)
        });

    let playcounts: BTreeMap<usize, u64> = join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(index, playcount)| playcount.map(|p| (index, p)))
        .collect();

    log::debug!(
        "Got play counts for {} of {} tracks by '{artist}'",
        playcounts.len(),
        tracks.len().min(limit)
    );
    playcounts
}

/// Fill in release years for the first `limit` albums of a listing.
///
/// Album details are fetched concurrently. Albums whose lookup fails, or whose
/// details carry no publish date, keep their current year. Albums beyond `limit` are
/// returned untouched.
pub async fn fetch_album_years<A>(api: &A, albums: Vec<AlbumSummary>, limit: usize) -> Vec<AlbumSummary>
where
    A: MelodyScopeApi + ?Sized,
{
    let lookups = albums.iter().take(limit).map(|album| async move {
        match api.fetch_album_details(&album.artist, &album.name).await {
            Ok(details) => details.and_then(|d| d.year),
            Err(e) => {
                log::debug!("No year for '{}': {e}", album.name);
                None
            }
        }
    });
    let years = join_all(lookups).await;

    let mut years = years.into_iter();
    albums
        .into_iter()
        .map(|mut album| {
            if let Some(Some(year)) = years.next() {
                album.year = Some(year);
            }
            album
        })
        .collect()
}

/// One bar of the play count chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPlaycount {
    /// Position of the track in the album listing
    pub index: usize,
    pub name: String,
    pub playcount: u64,
}

/// Rank an album's tracks by play count for charting.
///
/// A fetched play count wins over the track's own. Tracks with no plays are dropped;
/// the rest are ordered by play count, highest first, and cut to `limit`.
pub fn top_tracks_by_playcount(
    tracks: &[TrackSummary],
    fetched: &BTreeMap<usize, u64>,
    limit: usize,
) -> Vec<TrackPlaycount> {
    let mut ranked: Vec<TrackPlaycount> = tracks
        .iter()
        .enumerate()
        .map(|(index, track)| TrackPlaycount {
            index,
            name: track.name.clone(),
            playcount: fetched
                .get(&index)
                .copied()
                .or(track.playcount)
                .unwrap_or(0),
        })
        .filter(|t| t.playcount > 0)
        .collect();

    ranked.sort_by(|a, b| b.playcount.cmp(&a.playcount));
    ranked.truncate(limit);
    ranked
}
