pub mod monitor;
pub mod stream;
