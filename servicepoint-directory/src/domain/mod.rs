//! Domain model for carrier service points.

mod country;
mod service_point;

pub use country::{CountryCode, InvalidCountryCode};
pub use service_point::{Address, OpeningHours, ServicePoint};
