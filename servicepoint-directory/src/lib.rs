//! Carrier service point directory.
//!
//! Looks up parcel service points (pickup locations) from the carrier's
//! REST API, caches results in memory, and keeps a locally persisted
//! snapshot of the directory as an offline fallback.

pub mod cache;
pub mod carrier;
pub mod context;
pub mod directory;
pub mod domain;
pub mod geo;
pub mod snapshot;
