//! fpmon library: turns the summary output of a looping `fping` into
//! structured measurement records.

pub mod adapters;
pub mod domain;
mod error;
pub mod fmt;
pub mod output;
pub mod parser;
pub mod services;
pub mod sink;
pub mod stats;

pub use adapters::fping::FpingOptions;
pub use domain::measurement::MeasurementRecord;
pub use error::FpmonError;
pub use parser::line::{Rejected, parse_line};
pub use services::monitor::monitor;
pub use services::stream::{StreamEnd, StreamSummary, lines_from_reader, run};
pub use sink::{ChannelSink, MeasurementSink, SinkError};
