//! Carrier API response DTOs.
//!
//! These types map directly to the carrier's business-location JSON
//! responses. `Option` and `default` are used liberally because the API
//! omits fields rather than sending null, and because older and newer API
//! versions disagree on which fields exist.

use serde::Deserialize;

/// Root object of both the list and the find-by-id responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePointListDto {
    /// Envelope holding the actual payload. Absent on malformed or error
    /// responses.
    pub service_point_information_response: Option<ServicePointResponseDto>,
}

/// Response envelope holding the service point list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePointResponseDto {
    /// The service points themselves. Absent on structurally incomplete
    /// responses.
    pub service_points: Option<Vec<ServicePointDto>>,
}

/// One service point as reported by the carrier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicePointDto {
    pub service_point_id: String,

    pub name: String,

    /// Route distance in metres, computed by the carrier.
    pub route_distance: i32,

    pub routing_code: String,

    /// Whether the point accepts parcel handoff.
    pub eligible_parcel_outlet: bool,

    pub visiting_address: Option<AddressDto>,

    pub delivery_address: Option<AddressDto>,

    pub opening_hours: Vec<OpeningHourDto>,

    pub notification_area: Option<NotificationAreaDto>,

    /// Single-coordinate shape used by some API versions.
    /// Prefer [`ServicePointDto::resolved_coordinate`].
    pub coordinate: Option<CoordinateDto>,

    /// Coordinate-list shape used by other API versions.
    /// Prefer [`ServicePointDto::resolved_coordinate`].
    pub coordinates: Vec<CoordinateDto>,
}

impl ServicePointDto {
    /// Resolve the reported coordinate.
    ///
    /// Precedence: the singular `coordinate` field if present, else the
    /// first entry of the `coordinates` list, else a zero coordinate.
    /// Both shapes exist upstream depending on the API version, so this
    /// precedence must not change.
    pub fn resolved_coordinate(&self) -> CoordinateDto {
        self.coordinate
            .clone()
            .or_else(|| self.coordinates.first().cloned())
            .unwrap_or_default()
    }
}

/// A postal address on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDto {
    pub country_code: String,
    pub postal_code: String,
    pub city: String,
    pub street_name: String,
    pub street_number: String,
}

/// One opening-hours line. `from1`/`to1` are the carrier's field names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpeningHourDto {
    pub day: String,

    #[serde(rename = "from1")]
    pub from: String,

    #[serde(rename = "to1")]
    pub to: String,
}

/// Postal codes the point serves notifications for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationAreaDto {
    pub postal_codes: Vec<String>,
}

/// Coordinate pair with its spatial reference id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoordinateDto {
    /// Latitude in degrees.
    pub northing: f64,

    /// Longitude in degrees.
    pub easting: f64,

    /// Spatial reference system, e.g. "EPSG:4326".
    pub sr_id: String,
}
