//! Caltrain schedule sync.
//!
//! Pulls stops, timetables, holidays and live predictions from the 511.org
//! transit API, normalizes them into a flat domain model, derives a per-stop
//! journey graph and writes the result to a key-path document store.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod graph;
pub mod open511;
pub mod store;
pub mod sync;
