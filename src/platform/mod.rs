// GeoEval - platform/mod.rs
//
// Platform layer: config file location and loading, filesystem reads.
// Dependencies: core (for config targets), directories crate.

pub mod config;
pub mod fs;
