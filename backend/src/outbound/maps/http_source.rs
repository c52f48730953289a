//! Reqwest-backed Google Maps source adapter.
//!
//! This adapter owns transport details only: request construction, timeout
//! and HTTP error mapping, and JSON decoding into the domain route leg.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{DirectionsResponseDto, DistanceMatrixResponseDto};
use crate::domain::parcel::LatLng;
use crate::domain::ports::{RouteLeg, RouteSource, RouteSourceError};

const DISTANCE_MATRIX_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
const DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Maps source adapter performing HTTP GET requests against the Google
/// Maps web services.
pub struct GoogleMapsSource {
    client: Client,
    matrix_endpoint: String,
    directions_endpoint: String,
    api_key: String,
}

impl GoogleMapsSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            matrix_endpoint: DISTANCE_MATRIX_ENDPOINT.to_owned(),
            directions_endpoint: DIRECTIONS_ENDPOINT.to_owned(),
            api_key: api_key.into(),
        })
    }

    /// Override both endpoints, for tests against a local server.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn with_endpoints(
        mut self,
        matrix: impl Into<String>,
        directions: impl Into<String>,
    ) -> Self {
        self.matrix_endpoint = matrix.into();
        self.directions_endpoint = directions.into();
        self
    }

    fn build_url(endpoint: &str, params: &[(&str, &str)]) -> Result<Url, RouteSourceError> {
        Url::parse_with_params(endpoint, params)
            .map_err(|err| RouteSourceError::invalid_request(format!("bad endpoint URL: {err}")))
    }

    async fn fetch_json(&self, url: Url) -> Result<Vec<u8>, RouteSourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        Ok(body.to_vec())
    }
}

fn format_point(point: LatLng) -> String {
    format!("{},{}", point.lat, point.lng)
}

fn map_transport_error(error: reqwest::Error) -> RouteSourceError {
    if error.is_timeout() {
        RouteSourceError::timeout(error.to_string())
    } else {
        RouteSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> RouteSourceError {
    if status.is_client_error() {
        RouteSourceError::invalid_request(format!("provider returned {status}"))
    } else {
        RouteSourceError::transport(format!("provider returned {status}"))
    }
}

#[async_trait]
impl RouteSource for GoogleMapsSource {
    async fn distance_matrix(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<RouteLeg, RouteSourceError> {
        let url = Self::build_url(
            &self.matrix_endpoint,
            &[
                ("origins", format_point(origin).as_str()),
                ("destinations", format_point(destination).as_str()),
                ("mode", "driving"),
                ("units", "metric"),
                ("key", self.api_key.as_str()),
            ],
        )?;

        let body = self.fetch_json(url).await?;
        let decoded: DistanceMatrixResponseDto = serde_json::from_slice(&body).map_err(|err| {
            RouteSourceError::decode(format!("invalid distance matrix payload: {err}"))
        })?;
        decoded.into_route_leg().map_err(RouteSourceError::decode)
    }

    async fn route_polyline(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<Option<String>, RouteSourceError> {
        let url = Self::build_url(
            &self.directions_endpoint,
            &[
                ("origin", format_point(origin).as_str()),
                ("destination", format_point(destination).as_str()),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ],
        )?;

        let body = self.fetch_json(url).await?;
        let decoded: DirectionsResponseDto = serde_json::from_slice(&body).map_err(|err| {
            RouteSourceError::decode(format!("invalid directions payload: {err}"))
        })?;
        decoded.into_polyline().map_err(RouteSourceError::decode)
    }
}
