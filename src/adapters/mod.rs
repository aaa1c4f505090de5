//! Launching the external fping process.

pub mod fping;
