//! Service point records.

use std::hash::{Hash, Hasher};

/// A postal address attached to a service point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub country_code: String,
    pub postal_code: String,
    pub city: String,
    pub street_name: String,
    pub street_number: String,
}

/// One opening-hours entry, e.g. MONDAY 06:00 to 23:00.
///
/// Times are kept as the carrier reports them ("06:00" or "0600" depending
/// on the API version) and are not interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningHours {
    pub day: String,
    pub from: String,
    pub to: String,
}

/// A physical pickup/drop-off location for parcels.
///
/// Identity is the `id` field: two records compare equal iff their ids
/// match, regardless of the other fields.
#[derive(Debug, Clone, Default)]
pub struct ServicePoint {
    /// Carrier-assigned service point id.
    pub id: String,

    /// Human-readable name, e.g. the name of the hosting shop.
    pub name: String,

    /// Latitude in degrees.
    pub northing: f64,

    /// Longitude in degrees.
    pub easting: f64,

    /// Spatial reference system of the coordinate, e.g. "EPSG:4326".
    pub coordinate_id: String,

    /// Address for visiting customers.
    pub visiting_address: Option<Address>,

    /// Address used for parcel delivery.
    pub delivery_address: Option<Address>,

    /// Opening hours, in the order the carrier reports them. Never null;
    /// empty when the carrier omits them.
    pub opening_hours: Vec<OpeningHours>,

    /// Postal codes the point serves notifications for. Never null; empty
    /// when the carrier omits them.
    pub notification_postal_codes: Vec<String>,

    /// Whether the point accepts parcel handoff (vs. delivery-only).
    pub eligible_parcel_outlet: bool,

    /// Route distance in metres, as computed by the carrier. Unrelated to
    /// the great-circle distance used by nearest-neighbor search.
    pub route_distance: i32,
}

impl PartialEq for ServicePoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServicePoint {}

impl Hash for ServicePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, name: &str) -> ServicePoint {
        ServicePoint {
            id: id.to_string(),
            name: name.to_string(),
            ..ServicePoint::default()
        }
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = point("3690898", "COOP PRIX POSTGIROBYGGET");
        let b = point("3690898", "a completely different name");
        let c = point("3761681", "COOP PRIX POSTGIROBYGGET");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(point("3690898", "first"));

        assert!(set.contains(&point("3690898", "second")));
        assert!(!set.contains(&point("3761681", "first")));
    }

    #[test]
    fn default_collections_are_empty_not_absent() {
        let p = ServicePoint::default();
        assert!(p.opening_hours.is_empty());
        assert!(p.notification_postal_codes.is_empty());
    }
}
