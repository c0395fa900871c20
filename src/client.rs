use crate::api::{self, decode_body};
use crate::types::{AlbumDetails, AlbumSummary, TrackSummary};
use crate::{ClientConfig, MelodyScopeApi, MelodyScopeError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Client for the Last.fm JSON API.
///
/// Builds requests against the configured endpoint, enforces the request timeout,
/// detects Last.fm's error envelope and converts responses into the crate's domain
/// types.
///
/// # Examples
///
/// ```rust,no_run
/// use melody_scope::{ClientConfig, MelodyScopeApi, MelodyScopeClient, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let http_client = http_client::native::NativeClient::new();
///     let client = MelodyScopeClient::new(Box::new(http_client), ClientConfig::from_env());
///
///     for album in client.fetch_artist_top_albums("The Beatles").await? {
///         println!("{album}");
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MelodyScopeClient {
    client: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl MelodyScopeClient {
    /// Create a new [`MelodyScopeClient`].
    ///
    /// # Arguments
    ///
    /// * `client` - Any HTTP client implementation that implements [`HttpClient`]
    /// * `config` - Endpoint, API key and timeout; read once, never refreshed
    pub fn new(client: Box<dyn HttpClient>, config: ClientConfig) -> Self {
        if !config.has_api_key() {
            log::warn!(
                "{} is not set. Last.fm calls will fail.",
                crate::config::API_KEY_ENV_VAR
            );
        }

        Self {
            client: Arc::from(client),
            config,
        }
    }

    /// Create a client configured from the environment.
    pub fn from_env(client: Box<dyn HttpClient>) -> Self {
        Self::new(client, ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the full request URL for a method call.
    ///
    /// Every value is percent-encoded. The API key always comes first, followed by
    /// `format=json`, the method name and then `params` in order.
    pub fn build_url(&self, api_key: &str, method: &str, params: &[(&str, &str)]) -> String {
        let base = &self.config.base_url;
        let separator = if base.contains('?') { '&' } else { '?' };

        let query = [("api_key", api_key), ("format", "json"), ("method", method)]
            .into_iter()
            .chain(params.iter().copied())
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{base}{separator}{query}")
    }

    /// Call a Last.fm method and return the decoded body.
    ///
    /// Fails before any I/O when no API key is configured. Every other failure is
    /// logged here and returned to the caller once; there are no retries.
    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let api_key = self.config.api_key().ok_or_else(|| {
            MelodyScopeError::Config("Last.fm API key is not configured".to_string())
        })?;

        let url = self.build_url(api_key, method, params);
        let result = self.send(method, &url).await;

        if let Err(e) = &result {
            log::warn!("[{method}] {e}");
        }
        result
    }

    async fn send(&self, method: &str, url: &str) -> Result<Value> {
        let url = url
            .parse::<Url>()
            .map_err(|e| MelodyScopeError::Config(format!("Invalid Last.fm base URL: {e}")))?;
        let request = Request::new(Method::Get, url);

        log::debug!("Calling {method}");
        let request_start = Instant::now();

        let exchange = async {
            let mut response = self
                .client
                .send(request)
                .await
                .map_err(transport_error)?;

            let status: u16 = response.status().into();
            log::debug!(
                "{method} answered {status} after {}ms",
                request_start.elapsed().as_millis()
            );

            if !response.status().is_success() {
                return Err(MelodyScopeError::Http { status });
            }

            response
                .body_string()
                .await
                .map_err(transport_error)
        };

        // Dropping the exchange future on timeout aborts the in-flight request.
        let body = tokio::time::timeout(self.config.timeout, exchange)
            .await
            .map_err(|elapsed| {
                MelodyScopeError::transport_with_source(
                    format!(
                        "Last.fm request timed out after {}s",
                        self.config.timeout.as_secs_f32()
                    ),
                    elapsed,
                )
            })??;

        decode_body(&body)
    }
}

fn transport_error(e: http_types::Error) -> MelodyScopeError {
    let message = e.to_string();
    MelodyScopeError::transport_with_source(message, e.into_inner())
}

fn require(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MelodyScopeError::Validation(format!(
            "{what} name cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[async_trait(?Send)]
impl MelodyScopeApi for MelodyScopeClient {
    async fn fetch_artist_top_albums(&self, artist: &str) -> Result<Vec<AlbumSummary>> {
        let artist = require(artist, "Artist")?;

        let value = self
            .call(api::TOP_ALBUMS, &[("artist", artist.as_str())])
            .await?;
        let albums = api::parse_top_albums_response(value, &artist)?;

        log::debug!("Fetched {} top albums for '{artist}'", albums.len());
        Ok(albums)
    }

    async fn fetch_album_details(&self, artist: &str, album: &str) -> Result<Option<AlbumDetails>> {
        let artist = require(artist, "Artist")?;
        let album = require(album, "Album")?;

        let value = self
            .call(
                api::ALBUM_INFO,
                &[("artist", artist.as_str()), ("album", album.as_str())],
            )
            .await?;
        let details = api::parse_album_info_response(value)?;

        if details.is_none() {
            log::debug!("No album '{album}' by '{artist}'");
        }
        Ok(details)
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackSummary>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value = self.call(api::TRACK_SEARCH, &[("track", query)]).await?;
        api::parse_track_search_response(value)
    }

    async fn search_albums(&self, query: &str) -> Result<Vec<AlbumSummary>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value = self.call(api::ALBUM_SEARCH, &[("album", query)]).await?;
        api::parse_album_search_response(value)
    }

    async fn fetch_track_info(&self, artist: &str, track: &str) -> Option<u64> {
        let value = match self
            .call(api::TRACK_INFO, &[("artist", artist), ("track", track)])
            .await
        {
            Ok(value) => value,
            Err(e) => {
                log::debug!("No play count for '{track}' by '{artist}': {e}");
                return None;
            }
        };

        match api::parse_track_info_response(value) {
            Ok(playcount) => playcount,
            Err(e) => {
                log::warn!("[{}] {e}", api::TRACK_INFO);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(config: ClientConfig) -> MelodyScopeClient {
        MelodyScopeClient::new(Box::new(http_client::native::NativeClient::new()), config)
    }

    #[test]
    fn test_build_url_encodes_params() {
        let client = client_with(ClientConfig::new().with_api_key("k"));
        let url = client.build_url(
            "k",
            api::ALBUM_INFO,
            &[("artist", "Simon & Garfunkel"), ("album", "Bridge over Troubled Water")],
        );
        assert_eq!(
            url,
            "https://ws.audioscrobbler.com/2.0/?api_key=k&format=json&method=album.getinfo\
             &artist=Simon%20%26%20Garfunkel&album=Bridge%20over%20Troubled%20Water"
        );
    }

    #[test]
    fn test_build_url_appends_to_existing_query() {
        let client = client_with(
            ClientConfig::new()
                .with_api_key("k")
                .with_base_url("http://localhost/2.0/?debug=1"),
        );
        let url = client.build_url("k", api::TRACK_SEARCH, &[("track", "Blackbird")]);
        assert!(url.starts_with("http://localhost/2.0/?debug=1&api_key=k&format=json"));
        assert!(url.ends_with("&method=track.search&track=Blackbird"));
    }

    #[test]
    fn test_require_trims() {
        assert_eq!(require("  Radiohead ", "Artist").unwrap(), "Radiohead");
        let err = require("   ", "Album").unwrap_err();
        assert_eq!(err.to_string(), "Album name cannot be empty");
    }
}
