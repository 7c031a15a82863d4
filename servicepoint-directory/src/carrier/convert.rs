//! Conversion from carrier DTOs to domain records.

use crate::domain::{Address, OpeningHours, ServicePoint};

use super::types::{AddressDto, OpeningHourDto, ServicePointDto, ServicePointListDto};

/// Convert one wire DTO into a domain record.
///
/// The coordinate is resolved via [`ServicePointDto::resolved_coordinate`].
/// Omitted collections become empty vectors, never an absent value.
pub fn to_service_point(dto: &ServicePointDto) -> ServicePoint {
    let coordinate = dto.resolved_coordinate();

    ServicePoint {
        id: dto.service_point_id.clone(),
        name: dto.name.clone(),
        northing: coordinate.northing,
        easting: coordinate.easting,
        coordinate_id: coordinate.sr_id,
        visiting_address: dto.visiting_address.as_ref().map(to_address),
        delivery_address: dto.delivery_address.as_ref().map(to_address),
        opening_hours: dto.opening_hours.iter().map(to_opening_hours).collect(),
        notification_postal_codes: dto
            .notification_area
            .as_ref()
            .map(|area| area.postal_codes.clone())
            .unwrap_or_default(),
        eligible_parcel_outlet: dto.eligible_parcel_outlet,
        route_distance: dto.route_distance,
    }
}

/// Map a full wire document into domain records.
///
/// Returns `None` when the response envelope or the list itself is missing,
/// which callers treat as a structurally incomplete response.
pub fn to_service_points(root: &ServicePointListDto) -> Option<Vec<ServicePoint>> {
    let points = root
        .service_point_information_response
        .as_ref()?
        .service_points
        .as_ref()?;

    Some(points.iter().map(to_service_point).collect())
}

fn to_address(dto: &AddressDto) -> Address {
    Address {
        country_code: dto.country_code.clone(),
        postal_code: dto.postal_code.clone(),
        city: dto.city.clone(),
        street_name: dto.street_name.clone(),
        street_number: dto.street_number.clone(),
    }
}

fn to_opening_hours(dto: &OpeningHourDto) -> OpeningHours {
    OpeningHours {
        day: dto.day.clone(),
        from: dto.from.clone(),
        to: dto.to.clone(),
    }
}
