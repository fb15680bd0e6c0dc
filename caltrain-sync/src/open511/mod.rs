//! 511.org transit API integration.
//!
//! Raw payloads come from a [`TransitSource`]: the live [`Open511Client`] or
//! a [`FixtureSource`] of recorded bodies. [`parse`] turns them into domain
//! types.

mod client;
mod endpoint;
mod error;
mod mock;
pub mod parse;
mod types;

pub use client::{
    CALTRAIN_OPERATOR_ID, DEFAULT_BASE_URL, Open511Client, Open511Config, TransitSource,
};
pub use endpoint::Endpoint;
pub use error::FetchError;
pub use mock::FixtureSource;
pub use parse::{
    Holidays, PayloadError, parse_holidays, parse_stop_monitoring, parse_stop_places,
    parse_timetable,
};
