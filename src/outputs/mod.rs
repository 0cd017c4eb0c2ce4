//! Output generation for one-off `fetch` runs.
//!
//! - [`json`]: writes a [`crate::models::Digest`] snapshot to a dated directory

pub mod json;
