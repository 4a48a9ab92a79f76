// GeoEval - app/mod.rs
//
// Application layer: orchestration of extraction runs over log files.
// Dependencies: core and platform layers.

pub mod batch;
