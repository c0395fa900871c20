//! Wire-level response shapes for the Last.fm JSON API and their conversion into
//! the crate's domain types.
//!
//! Every parser here takes an already-decoded [`serde_json::Value`] that has passed
//! [`check_api_envelope`], so the functions can be exercised directly against
//! recorded responses without any HTTP plumbing.

use crate::normalize::{normalize_duration, normalize_playcount};
use crate::types::{AlbumDetails, AlbumSummary, Image, TrackSummary};
use crate::{MelodyScopeError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::OnceLock;

// =============================================================================
// Method names
// =============================================================================

pub const TOP_ALBUMS: &str = "artist.gettopalbums";
pub const ALBUM_INFO: &str = "album.getinfo";
pub const TRACK_SEARCH: &str = "track.search";
pub const ALBUM_SEARCH: &str = "album.search";
pub const TRACK_INFO: &str = "track.getinfo";

// =============================================================================
// Envelope handling
// =============================================================================

/// Decode a response body into JSON and reject Last.fm's error envelope.
pub fn decode_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)?;
    check_api_envelope(&value)?;
    Ok(value)
}

/// Fail if a decoded body is an error envelope.
///
/// Last.fm reports failures such as an invalid API key with HTTP 200 and a body of
/// the form `{"error": 10, "message": "Invalid API key"}`, so the HTTP status alone
/// is not enough.
pub fn check_api_envelope(value: &Value) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };
    if !object.contains_key("error") {
        return Ok(());
    }

    let code = object.get("error").and_then(|code| match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("Unknown error")
        .to_string();

    Err(MelodyScopeError::Api { code, message })
}

// =============================================================================
// Shared wire types
// =============================================================================

/// A list field that Last.fm sends as a bare object when it holds one element.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Artist references come as `{"name": ...}` in some methods and as plain strings in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiArtistRef {
    Object { name: String },
    Name(String),
}

impl ApiArtistRef {
    fn into_name(self) -> String {
        match self {
            ApiArtistRef::Object { name } | ApiArtistRef::Name(name) => name,
        }
    }
}

// =============================================================================
// artist.gettopalbums
// =============================================================================

#[derive(Deserialize)]
struct ApiTopAlbumsResponse {
    topalbums: Option<ApiTopAlbums>,
}

#[derive(Deserialize)]
struct ApiTopAlbums {
    #[serde(default, deserialize_with = "one_or_many")]
    album: Vec<ApiTopAlbum>,
}

#[derive(Deserialize)]
struct ApiTopAlbum {
    #[serde(default)]
    name: String,
    artist: Option<ApiArtistRef>,
    playcount: Option<Value>,
    #[serde(default)]
    url: String,
    #[serde(default, deserialize_with = "one_or_many")]
    image: Vec<Image>,
}

/// Convert an `artist.gettopalbums` body. Rows without an artist fall back to `requested_artist`.
pub fn parse_top_albums_response(value: Value, requested_artist: &str) -> Result<Vec<AlbumSummary>> {
    let response: ApiTopAlbumsResponse = serde_json::from_value(value)?;
    let albums = response.topalbums.map(|t| t.album).unwrap_or_default();

    Ok(albums
        .into_iter()
        .map(|a| AlbumSummary {
            name: a.name,
            artist: a
                .artist
                .map(ApiArtistRef::into_name)
                .unwrap_or_else(|| requested_artist.to_string()),
            playcount: normalize_playcount(a.playcount.as_ref()),
            url: a.url,
            images: a.image,
            year: None,
        })
        .collect())
}

// =============================================================================
// album.getinfo
// =============================================================================

#[derive(Deserialize)]
struct ApiAlbumInfoResponse {
    album: Option<ApiAlbumInfo>,
}

#[derive(Deserialize)]
struct ApiAlbumInfo {
    #[serde(default)]
    name: String,
    artist: Option<ApiArtistRef>,
    #[serde(default)]
    url: String,
    #[serde(default, deserialize_with = "one_or_many")]
    image: Vec<Image>,
    listeners: Option<Value>,
    playcount: Option<Value>,
    tracks: Option<ApiTrackList>,
    wiki: Option<ApiWiki>,
}

#[derive(Deserialize)]
struct ApiTrackList {
    #[serde(default, deserialize_with = "one_or_many")]
    track: Vec<ApiAlbumTrack>,
}

#[derive(Deserialize)]
struct ApiAlbumTrack {
    #[serde(default)]
    name: String,
    duration: Option<Value>,
    #[serde(default)]
    url: String,
    playcount: Option<Value>,
}

#[derive(Deserialize)]
struct ApiWiki {
    summary: Option<String>,
    published: Option<String>,
}

/// Convert an `album.getinfo` body. Returns `Ok(None)` when the body has no `album`.
pub fn parse_album_info_response(value: Value) -> Result<Option<AlbumDetails>> {
    let response: ApiAlbumInfoResponse = serde_json::from_value(value)?;
    let Some(album) = response.album else {
        return Ok(None);
    };

    let tracks = album
        .tracks
        .map(|list| list.track)
        .unwrap_or_default()
        .into_iter()
        .map(|t| TrackSummary {
            name: t.name,
            duration_seconds: normalize_duration(t.duration.as_ref()),
            url: t.url,
            playcount: normalize_playcount(t.playcount.as_ref()),
            artist: None,
        })
        .collect();

    let (wiki_summary, published) = match album.wiki {
        Some(wiki) => (wiki.summary, wiki.published),
        None => (None, None),
    };

    Ok(Some(AlbumDetails {
        name: album.name,
        artist: album.artist.map(ApiArtistRef::into_name).unwrap_or_default(),
        url: album.url,
        images: album.image,
        listeners: album.listeners.as_ref().and_then(raw_string),
        playcount: album.playcount.as_ref().and_then(raw_string),
        tracks,
        wiki_summary,
        year: published.as_deref().and_then(year_from_published),
    }))
}

/// Keep a count the way Last.fm sent it, as text.
fn raw_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract the calendar year from a wiki publish date such as `"26 Sep 1969, 00:00"`.
pub fn year_from_published(published: &str) -> Option<String> {
    let published = published.trim();
    if published.is_empty() {
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(published, "%d %b %Y, %H:%M")
        .map(|dt| dt.year())
        .or_else(|_| NaiveDate::parse_from_str(published, "%Y-%m-%d").map(|d| d.year()))
        .or_else(|_| DateTime::parse_from_rfc3339(published).map(|dt| dt.year()));

    if let Ok(year) = parsed {
        return Some(year.to_string());
    }

    static YEAR: OnceLock<Regex> = OnceLock::new();
    let year = YEAR.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is valid"));
    year.captures(published)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// =============================================================================
// track.search / album.search
// =============================================================================

#[derive(Deserialize)]
struct ApiTrackSearchResponse {
    results: Option<ApiTrackSearchResults>,
}

#[derive(Deserialize)]
struct ApiTrackSearchResults {
    trackmatches: Option<ApiTrackMatches>,
}

#[derive(Deserialize)]
struct ApiTrackMatches {
    #[serde(default, deserialize_with = "one_or_many")]
    track: Vec<ApiTrackMatch>,
}

#[derive(Deserialize)]
struct ApiTrackMatch {
    #[serde(default)]
    name: String,
    artist: Option<ApiArtistRef>,
    #[serde(default)]
    url: String,
}

pub fn parse_track_search_response(value: Value) -> Result<Vec<TrackSummary>> {
    let response: ApiTrackSearchResponse = serde_json::from_value(value)?;
    let matches = response
        .results
        .and_then(|r| r.trackmatches)
        .map(|m| m.track)
        .unwrap_or_default();

    Ok(matches
        .into_iter()
        .map(|t| TrackSummary {
            name: t.name,
            duration_seconds: None,
            url: t.url,
            playcount: None,
            artist: t.artist.map(ApiArtistRef::into_name),
        })
        .collect())
}

#[derive(Deserialize)]
struct ApiAlbumSearchResponse {
    results: Option<ApiAlbumSearchResults>,
}

#[derive(Deserialize)]
struct ApiAlbumSearchResults {
    albummatches: Option<ApiAlbumMatches>,
}

#[derive(Deserialize)]
struct ApiAlbumMatches {
    #[serde(default, deserialize_with = "one_or_many")]
    album: Vec<ApiAlbumMatch>,
}

#[derive(Deserialize)]
struct ApiAlbumMatch {
    #[serde(default)]
    name: String,
    artist: Option<ApiArtistRef>,
    #[serde(default)]
    url: String,
    #[serde(default, deserialize_with = "one_or_many")]
    image: Vec<Image>,
}

pub fn parse_album_search_response(value: Value) -> Result<Vec<AlbumSummary>> {
    let response: ApiAlbumSearchResponse = serde_json::from_value(value)?;
    let matches = response
        .results
        .and_then(|r| r.albummatches)
        .map(|m| m.album)
        .unwrap_or_default();

    Ok(matches
        .into_iter()
        .map(|a| AlbumSummary {
            name: a.name,
            artist: a.artist.map(ApiArtistRef::into_name).unwrap_or_default(),
            playcount: None,
            url: a.url,
            images: a.image,
            year: None,
        })
        .collect())
}

// =============================================================================
// track.getinfo
// =============================================================================

#[derive(Deserialize)]
struct ApiTrackInfoResponse {
    track: Option<ApiTrackInfo>,
}

#[derive(Deserialize)]
struct ApiTrackInfo {
    playcount: Option<Value>,
}

/// Extract the play count from a `track.getinfo` body.
pub fn parse_track_info_response(value: Value) -> Result<Option<u64>> {
    let response: ApiTrackInfoResponse = serde_json::from_value(value)?;
    Ok(response
        .track
        .and_then(|t| normalize_playcount(t.playcount.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_envelope_error_detected() {
        let body = r#"{"error": 10, "message": "Invalid API key - You must be granted a valid key by last.fm"}"#;
        let err = decode_body(body).unwrap_err();
        match err {
            MelodyScopeError::Api { code, message } => {
                assert_eq!(code, Some(10));
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_error_without_message() {
        let err = check_api_envelope(&json!({"error": 6})).unwrap_err();
        assert_eq!(err.to_string(), "Last.fm API error: Unknown error");
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let err = decode_body("<html>Bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_parse_top_albums() {
        let value = json!({
            "topalbums": {
                "album": [
                    {
                        "name": "Abbey Road",
                        "artist": {"name": "The Beatles"},
                        "playcount": "1234567",
                        "url": "https://www.last.fm/music/The+Beatles/Abbey+Road",
                        "image": [{"#text": "https://img/abbey.png", "size": "large"}]
                    },
                    {
                        "name": "Sgt. Pepper",
                        "playcount": 987654,
                        "url": "https://www.last.fm/music/The+Beatles/Sgt.+Pepper"
                    }
                ]
            }
        });

        let albums = parse_top_albums_response(value, "The Beatles").unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].playcount, Some(1234567));
        assert_eq!(albums[0].cover_url(), "https://img/abbey.png");
        assert_eq!(albums[1].artist, "The Beatles");
        assert_eq!(albums[1].playcount, Some(987654));
        assert!(albums[1].images.is_empty());
        assert!(albums.iter().all(|a| a.year.is_none()));
    }

    #[test]
    fn test_parse_top_albums_empty() {
        assert!(parse_top_albums_response(json!({}), "X").unwrap().is_empty());
        assert!(parse_top_albums_response(json!({"topalbums": {}}), "X")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_album_info_single_track_object() {
        let value = json!({
            "album": {
                "name": "Single",
                "artist": "Artist",
                "url": "https://last.fm/single",
                "image": [],
                "tracks": {
                    "track": {"name": "Only Track", "duration": "200", "url": "https://last.fm/t"}
                }
            }
        });

        let album = parse_album_info_response(value).unwrap().unwrap();
        assert_eq!(album.tracks.len(), 1);
        assert_eq!(album.tracks[0].name, "Only Track");
        assert_eq!(album.tracks[0].duration_seconds, Some(200));
    }

    #[test]
    fn test_album_info_without_tracks() {
        let value = json!({"album": {"name": "Empty", "artist": "Artist", "url": "", "image": []}});
        let album = parse_album_info_response(value).unwrap().unwrap();
        assert!(album.tracks.is_empty());
        assert_eq!(album.year, None);
    }

    #[test]
    fn test_album_info_missing_album_is_none() {
        assert_eq!(parse_album_info_response(json!({})).unwrap(), None);
    }

    #[test]
    fn test_album_info_keeps_raw_counts_and_year() {
        let value = json!({
            "album": {
                "name": "Abbey Road",
                "artist": "The Beatles",
                "url": "https://last.fm/abbey",
                "image": [],
                "listeners": "1500000",
                "playcount": "50000000",
                "tracks": {"track": [
                    {"name": "Come Together", "duration": 259, "url": "u1"},
                    {"name": "Something", "duration": null, "url": "u2", "playcount": "12"}
                ]},
                "wiki": {
                    "published": "26 Sep 1969, 00:00",
                    "summary": "Abbey Road is the eleventh studio album <a href=\"x\">Read more</a>"
                }
            }
        });

        let album = parse_album_info_response(value).unwrap().unwrap();
        assert_eq!(album.listeners.as_deref(), Some("1500000"));
        assert_eq!(album.playcount.as_deref(), Some("50000000"));
        assert_eq!(album.year.as_deref(), Some("1969"));
        assert!(album.wiki_summary.unwrap().contains("<a href"));
        assert_eq!(album.tracks[1].duration_seconds, None);
        assert_eq!(album.tracks[1].playcount, Some(12));
    }

    #[test]
    fn test_year_from_published_formats() {
        assert_eq!(year_from_published("26 Sep 1969, 00:00").as_deref(), Some("1969"));
        assert_eq!(year_from_published("2001-03-15").as_deref(), Some("2001"));
        assert_eq!(year_from_published("2010-06-01T12:00:00Z").as_deref(), Some("2010"));
        assert_eq!(year_from_published("sometime in 1997").as_deref(), Some("1997"));
        assert_eq!(year_from_published(""), None);
        assert_eq!(year_from_published("unknown"), None);
    }

    #[test]
    fn test_parse_track_search() {
        let value = json!({
            "results": {"trackmatches": {"track": [
                {"name": "Yesterday", "artist": "The Beatles", "url": "u1"},
                {"name": "Yesterday", "artist": "Boyz II Men", "url": "u2"}
            ]}}
        });
        let tracks = parse_track_search_response(value).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].artist.as_deref(), Some("Boyz II Men"));
        assert!(tracks.iter().all(|t| t.duration_seconds.is_none()));
    }

    #[test]
    fn test_parse_album_search() {
        let value = json!({
            "results": {"albummatches": {"album": [
                {"name": "Revolver", "artist": "The Beatles", "url": "u", "image": [{"#text": "i", "size": "medium"}]}
            ]}}
        });
        let albums = parse_album_search_response(value).unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].artist, "The Beatles");
        assert_eq!(albums[0].playcount, None);
        assert_eq!(albums[0].cover_url(), "i");
    }

    #[test]
    fn test_parse_track_info() {
        assert_eq!(
            parse_track_info_response(json!({"track": {"name": "t", "playcount": "321"}})).unwrap(),
            Some(321)
        );
        assert_eq!(
            parse_track_info_response(json!({"track": {"name": "t"}})).unwrap(),
            None
        );
        assert_eq!(parse_track_info_response(json!({})).unwrap(), None);
    }
}
