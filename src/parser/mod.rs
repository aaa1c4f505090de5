//! Pure parsing of fping output.

pub mod line;
