//! Flight lookup and airport board service
//!
//! Wraps an aviationstack-compatible provider: flight number lookups split
//! into current, past and upcoming occurrences, and airport boards windowed
//! around a day with codeshares collapsed.

pub mod airports;
pub mod board;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod rate_limit;
pub mod schedule;
pub mod server;
pub mod upstream;
