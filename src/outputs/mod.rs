//! Output writers for fetched articles.
//!
//! - [`json`]: pretty JSON to stdout or a file

pub mod json;
