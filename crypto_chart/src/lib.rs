//! Web and command-line front end tying the bar fetcher, the CSV store and
//! the chart renderer together.

pub mod cli;
pub mod config;
pub mod pages;
pub mod pipeline;
pub mod routes;
