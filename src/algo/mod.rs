//! Mesh algorithms written against the property map protocol.
//!
//! Everything here reads mesh attributes only through [`crate::pmap`], so
//! callers can substitute their own weights or numbering.

pub mod geodesic;
