//! # assetflow
//!
//! Command-line front end over `assetflow-core`: settings resolution, the
//! clap command tree and the CSV/JSON/text exports.

pub mod cli;
pub mod export;
pub mod settings;
