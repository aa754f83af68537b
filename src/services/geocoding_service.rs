//! Nominatim geocoding client.
//!
//! Reverse lookups turn a map position into a display address; forward
//! lookups power the place-name typeahead of the address picker.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::{
    config::AppConfig,
    error::UpstreamError,
    models::address::{GeoPoint, PlaceSuggestion},
};

pub const MAX_PLACE_SUGGESTIONS: usize = 8;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Display name of the place at `point`.
    async fn reverse(&self, point: GeoPoint) -> Result<String, UpstreamError>;
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

pub struct NominatimClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl NominatimClient {
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        // Nominatim's usage policy rejects requests without a user agent.
        let mut headers = HeaderMap::new();
        if let Ok(agent) = HeaderValue::from_str(&config.geocoder_user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(&config.nominatim_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!("Nominatim request: {}", url);
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "nominatim",
                status: response.status().as_u16(),
            });
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode {
            service: "nominatim",
            detail: format!("{}. Response: {}", e, text),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, point: GeoPoint) -> Result<String, UpstreamError> {
        let mut url = self.endpoint("reverse");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &point.lat.to_string())
            .append_pair("lon", &point.lng.to_string());

        let body: NominatimReverse = self.get(url).await?;
        match (body.display_name, body.error) {
            (Some(name), _) => Ok(name),
            (None, error) => Err(UpstreamError::Decode {
                service: "nominatim",
                detail: error.unwrap_or_else(|| "no display name".to_string()),
            }),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, UpstreamError> {
        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", &MAX_PLACE_SUGGESTIONS.to_string())
            .append_pair("addressdetails", "1");

        let places: Vec<NominatimPlace> = self.get(url).await?;
        Ok(places
            .into_iter()
            .filter_map(|place| {
                let lat = place.lat.parse().ok()?;
                let lng = place.lon.parse().ok()?;
                Some(PlaceSuggestion {
                    display_name: place.display_name,
                    point: GeoPoint { lat, lng },
                })
            })
            .take(MAX_PLACE_SUGGESTIONS)
            .collect())
    }
}
