//! Command-line front end for the 837P converter.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
