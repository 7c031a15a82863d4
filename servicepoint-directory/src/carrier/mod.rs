//! Carrier service point API client.
//!
//! Talks to the carrier's business-location REST endpoints and converts
//! the wire DTOs into domain records.

mod client;
mod convert;
mod error;
pub mod mock;
mod types;

pub use client::{CarrierApi, CarrierClient, CarrierConfig};
pub use convert::{to_service_point, to_service_points};
pub use error::CarrierError;
pub use types::{
    AddressDto, CoordinateDto, NotificationAreaDto, OpeningHourDto, ServicePointDto,
    ServicePointListDto, ServicePointResponseDto,
};
