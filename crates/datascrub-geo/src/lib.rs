//! Datascrub Geo - Boundary polygons and coordinate validation
//!
//! This crate checks whether each row's coordinates fall inside a boundary
//! polygon and appends the result to the table.

pub mod boundary;
pub mod integrity;

pub use boundary::Boundary;
pub use integrity::{check_geo_integrity, check_geo_integrity_with, GeoColumns};
