//! Output generation for handler responses.
//!
//! - [`json`]: serializes the response envelope to stdout or a file

pub mod json;
