//! HTTP catalog client
//!
//! Talks to an Apple-Music-style REST catalog:
//! - `GET {base}/catalog/{storefront}/search?term=..&types=artists&limit=..`
//! - `GET {base}/catalog/{storefront}/artists/{id}?views=top-songs`
//! - `GET {base}/catalog/{storefront}/search?term=..&types=songs&limit=..`
//!
//! Requests carry the developer token as a bearer token and, when configured,
//! the user token in `Music-User-Token`. All requests share one rate limiter.

use super::{CatalogApi, CatalogError, ARTIST_SEARCH_LIMIT, SONG_SEARCH_LIMIT};
use crate::config::LineupConfig;
use crate::models::{Artist, Song};
use fprep_common::config::is_valid_value;
use governor::{Quota, RateLimiter};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("fprep-lineup/", env!("CARGO_PKG_VERSION"));
const USER_TOKEN_HEADER: &str = "Music-User-Token";

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    artists: Option<ResourceList<ArtistAttributes>>,
    songs: Option<ResourceList<SongAttributes>>,
}

#[derive(Debug, Deserialize)]
struct ResourceList<A> {
    #[serde(default = "Vec::new")]
    data: Vec<Resource<A>>,
}

#[derive(Debug, Deserialize)]
struct Resource<A> {
    id: String,
    attributes: Option<A>,
}

#[derive(Debug, Deserialize)]
struct ArtistAttributes {
    name: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongAttributes {
    name: String,
    #[serde(default)]
    artist_name: String,
}

#[derive(Debug, Deserialize)]
struct ArtistDetailResponse {
    #[serde(default)]
    data: Vec<ArtistDetail>,
}

#[derive(Debug, Deserialize)]
struct ArtistDetail {
    views: Option<ArtistViews>,
}

#[derive(Debug, Deserialize)]
struct ArtistViews {
    #[serde(rename = "top-songs")]
    top_songs: Option<ResourceList<SongAttributes>>,
}

impl Resource<ArtistAttributes> {
    fn into_artist(self) -> Option<Artist> {
        let attributes = self.attributes?;
        Some(Artist {
            id: self.id,
            name: attributes.name,
            url: attributes.url,
        })
    }
}

impl Resource<SongAttributes> {
    fn into_song(self) -> Option<Song> {
        let attributes = self.attributes?;
        Some(Song {
            id: Some(self.id),
            title: attributes.name,
            artist_name: attributes.artist_name,
        })
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Parse an artist search response body (resources without attributes are skipped)
pub(crate) fn parse_artist_search(body: &str) -> Result<Vec<Artist>, CatalogError> {
    let response: SearchResponse = parse_json(body)?;
    Ok(response
        .results
        .artists
        .map(|list| list.data.into_iter().filter_map(|r| r.into_artist()).collect())
        .unwrap_or_default())
}

/// Parse a song search response body
pub(crate) fn parse_song_search(body: &str) -> Result<Vec<Song>, CatalogError> {
    let response: SearchResponse = parse_json(body)?;
    Ok(response
        .results
        .songs
        .map(|list| list.data.into_iter().filter_map(|r| r.into_song()).collect())
        .unwrap_or_default())
}

/// Parse an artist detail body; `None` when the response holds no artist record
pub(crate) fn parse_artist_top_songs(body: &str) -> Result<Option<Vec<Song>>, CatalogError> {
    let response: ArtistDetailResponse = parse_json(body)?;
    let Some(detail) = response.data.into_iter().next() else {
        return Ok(None);
    };
    let songs = detail
        .views
        .and_then(|views| views.top_songs)
        .map(|list| list.data.into_iter().filter_map(|r| r.into_song()).collect())
        .unwrap_or_default();
    Ok(Some(songs))
}

/// Token headers sent with every request; blank tokens are not sent
pub(crate) fn default_headers(config: &LineupConfig) -> Result<header::HeaderMap, CatalogError> {
    let mut headers = header::HeaderMap::new();
    if let Some(token) = config.developer_token.as_deref().filter(|t| is_valid_value(t)) {
        let value = header::HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| CatalogError::Network(format!("Invalid developer token: {}", e)))?;
        headers.insert(header::AUTHORIZATION, value);
    }
    if let Some(token) = config.user_token.as_deref().filter(|t| is_valid_value(t)) {
        let value = header::HeaderValue::from_str(token.trim())
            .map_err(|e| CatalogError::Network(format!("Invalid user token: {}", e)))?;
        headers.insert(USER_TOKEN_HEADER, value);
    }
    Ok(headers)
}

/// Catalog client over HTTP
pub struct HttpCatalogClient {
    http_client: Client,
    base_url: String,
    storefront: String,
    rate_limiter: DirectRateLimiter,
}

impl HttpCatalogClient {
    pub fn new(config: &LineupConfig) -> Result<Self, CatalogError> {
        let headers = default_headers(config)?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            storefront: config.storefront.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn catalog_url(&self, path: &str) -> String {
        format!("{}/catalog/{}/{}", self.base_url, self.storefront, path)
    }

    /// Rate-limited GET; `Ok(None)` on 404
    async fn get_body(&self, url: &str, query: &[(&str, String)]) -> Result<Option<String>, CatalogError> {
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Querying catalog API");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::TOO_MANY_REQUESTS => return Err(CatalogError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CatalogError::Unauthorized(status.as_u16()))
            }
            _ => {}
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Some(body))
    }
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn search_artists(&self, term: &str, limit: usize) -> Result<Vec<Artist>, CatalogError> {
        let limit = limit.clamp(1, ARTIST_SEARCH_LIMIT);
        let url = self.catalog_url("search");
        let query = [
            ("term", term.to_string()),
            ("types", "artists".to_string()),
            ("limit", limit.to_string()),
        ];

        match self.get_body(&url, &query).await? {
            Some(body) => {
                let mut artists = parse_artist_search(&body)?;
                artists.truncate(limit);
                debug!(
                    term = %term,
                    results = ?artists.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
                    "Artist search results"
                );
                Ok(artists)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn artist_top_songs(&self, artist_id: &str) -> Result<Option<Vec<Song>>, CatalogError> {
        let url = self.catalog_url(&format!("artists/{}", artist_id));
        let query = [("views", "top-songs".to_string())];

        match self.get_body(&url, &query).await? {
            Some(body) => parse_artist_top_songs(&body),
            None => Ok(None),
        }
    }

    async fn search_songs(&self, term: &str, limit: usize) -> Result<Vec<Song>, CatalogError> {
        let limit = limit.clamp(1, SONG_SEARCH_LIMIT);
        let url = self.catalog_url("search");
        let query = [
            ("term", term.to_string()),
            ("types", "songs".to_string()),
            ("limit", limit.to_string()),
        ];

        match self.get_body(&url, &query).await? {
            Some(body) => {
                let mut songs = parse_song_search(&body)?;
                songs.truncate(limit);
                Ok(songs)
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artist_search() {
        let body = r#"{
            "results": {
                "artists": {
                    "data": [
                        {"id": "1", "type": "artists", "attributes": {"name": "BTS", "url": "https://music.example/bts"}},
                        {"id": "2", "type": "artists"},
                        {"id": "3", "type": "artists", "attributes": {"name": "BTS Army"}}
                    ]
                }
            }
        }"#;

        let artists = parse_artist_search(body).unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0], Artist::new("1", "BTS").with_url("https://music.example/bts"));
        assert_eq!(artists[1].name, "BTS Army");
        assert_eq!(artists[1].url, None);
    }

    #[test]
    fn test_parse_empty_search() {
        assert!(parse_artist_search(r#"{"results": {}}"#).unwrap().is_empty());
        assert!(parse_artist_search(r#"{}"#).unwrap().is_empty());
        assert!(parse_song_search(r#"{"results": {"songs": {"data": []}}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_song_search() {
        let body = r#"{"results": {"songs": {"data": [
            {"id": "s1", "attributes": {"name": "Ditto", "artistName": "NewJeans"}},
            {"id": "s2", "attributes": {"name": "Hype Boy", "artistName": "NewJeans"}}
        ]}}}"#;

        let songs = parse_song_search(body).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Ditto");
        assert_eq!(songs[0].artist_name, "NewJeans");
        assert_eq!(songs[1].id.as_deref(), Some("s2"));
    }

    #[test]
    fn test_parse_artist_top_songs() {
        let body = r#"{"data": [{"id": "1", "views": {"top-songs": {"data": [
            {"id": "t1", "attributes": {"name": "Dynamite", "artistName": "BTS"}}
        ]}}}]}"#;
        let songs = parse_artist_top_songs(body).unwrap().unwrap();
        assert_eq!(songs, vec![Song { id: Some("t1".into()), title: "Dynamite".into(), artist_name: "BTS".into() }]);

        let no_view = r#"{"data": [{"id": "1", "attributes": {"name": "BTS"}}]}"#;
        assert_eq!(parse_artist_top_songs(no_view).unwrap(), Some(vec![]));

        assert_eq!(parse_artist_top_songs(r#"{"data": []}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(parse_artist_search("not json"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_client_creation() {
        let config = LineupConfig {
            developer_token: Some("dev-token".to_string()),
            ..LineupConfig::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(
            client.catalog_url("search"),
            "https://api.music.apple.com/v1/catalog/us/search"
        );
    }

    #[test]
    fn test_client_rejects_invalid_token() {
        let config = LineupConfig {
            developer_token: Some("bad\ntoken".to_string()),
            ..LineupConfig::default()
        };
        assert!(matches!(HttpCatalogClient::new(&config), Err(CatalogError::Network(_))));
    }

    #[test]
    fn test_blank_tokens_not_sent() {
        let config = LineupConfig {
            developer_token: Some("dev-token".to_string()),
            user_token: Some("   ".to_string()),
            ..LineupConfig::default()
        };
        let headers = default_headers(&config).unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer dev-token");
        assert!(headers.get(USER_TOKEN_HEADER).is_none());

        let config = LineupConfig {
            developer_token: Some("\t".to_string()),
            user_token: Some(" user-token ".to_string()),
            ..LineupConfig::default()
        };
        let headers = default_headers(&config).unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(headers.get(USER_TOKEN_HEADER).unwrap(), "user-token");
    }
}
