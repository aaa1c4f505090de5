pub mod writer;

pub use writer::{ConsoleSink, RecordFormat};
