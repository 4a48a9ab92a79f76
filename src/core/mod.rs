// GeoEval - core/mod.rs
//
// Core logic layer: coordinates, record model, the log extractor, statistics,
// export, and file discovery.
// Must NOT depend on: platform or app.

pub mod coord;
pub mod discovery;
pub mod export;
pub mod extractor;
pub mod model;
pub mod stats;
