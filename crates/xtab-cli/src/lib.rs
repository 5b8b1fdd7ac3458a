//! Command-line front end for the XML table explorer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
