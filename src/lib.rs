#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod content;
pub mod deadline;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod formats;
pub mod input;
pub mod logging;
pub mod scrape;
