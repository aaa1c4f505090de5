//! Rendering of records and session stats.

pub mod json;
pub mod text;
