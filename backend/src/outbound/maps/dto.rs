//! DTOs for decoding Google Maps JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! domain [`RouteLeg`](crate::domain::ports::RouteLeg) in one pass.

use serde::Deserialize;

use crate::domain::ports::RouteLeg;

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) rows: Vec<DistanceMatrixRowDto>,
    #[serde(default)]
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixRowDto {
    #[serde(default)]
    pub(super) elements: Vec<DistanceMatrixElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixElementDto {
    pub(super) status: String,
    pub(super) distance: Option<ValueDto>,
    pub(super) duration: Option<ValueDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ValueDto {
    pub(super) value: i64,
}

impl DistanceMatrixResponseDto {
    /// Extract the single requested leg from the matrix.
    pub(super) fn into_route_leg(self) -> Result<RouteLeg, String> {
        if self.status != "OK" {
            return Err(match self.error_message {
                Some(message) => format!("provider status {}: {message}", self.status),
                None => format!("provider status {}", self.status),
            });
        }
        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| "response contains no matrix elements".to_owned())?;
        if element.status != "OK" {
            return Err(format!("matrix element status {}", element.status));
        }
        let distance = element
            .distance
            .ok_or_else(|| "matrix element missing distance".to_owned())?;
        let duration = element
            .duration
            .ok_or_else(|| "matrix element missing duration".to_owned())?;
        Ok(RouteLeg {
            distance_meters: distance.value,
            duration_seconds: duration.value,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) routes: Vec<DirectionsRouteDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsRouteDto {
    pub(super) overview_polyline: Option<PolylineDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PolylineDto {
    pub(super) points: String,
}

impl DirectionsResponseDto {
    /// Extract the overview polyline of the first returned route, if any.
    ///
    /// `ZERO_RESULTS` is not an error: some coordinate pairs simply have no
    /// drivable route.
    pub(super) fn into_polyline(self) -> Result<Option<String>, String> {
        match self.status.as_str() {
            "OK" => Ok(self
                .routes
                .into_iter()
                .next()
                .and_then(|route| route.overview_polyline)
                .map(|polyline| polyline.points)),
            "ZERO_RESULTS" => Ok(None),
            status => Err(format!("provider status {status}")),
        }
    }
}
