//! Fetching daily crypto bars from Alpaca and persisting them as CSV.

pub mod fetch;
pub mod io;
pub mod models;
pub mod providers;
