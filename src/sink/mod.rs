//! Destinations for parsed measurement records.
//!
//! The stream driver owns no storage; every record it produces is handed to a
//! [`MeasurementSink`] exactly once, in the order the source lines arrived.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::measurement::MeasurementRecord;

/// Failure to accept a single record. Never fatal to a monitoring session.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The receiving side is gone.
    #[error("sink closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The record could not be serialized.
    #[error("encode: {0}")]
    Encode(String),
    #[error("{0}")]
    Other(String),
}

/// Receiver of measurement records.
///
/// The driver awaits each `write` before reading the next line, so an
/// implementation never sees two calls in flight.
#[async_trait]
pub trait MeasurementSink: Send {
    async fn write(&mut self, record: MeasurementRecord) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: MeasurementSink + ?Sized> MeasurementSink for Box<S> {
    async fn write(&mut self, record: MeasurementRecord) -> Result<(), SinkError> {
        (**self).write(record).await
    }
}

/// Forwards records to an MPSC channel, e.g. a storage task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<MeasurementRecord>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<MeasurementRecord>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl MeasurementSink for ChannelSink {
    async fn write(&mut self, record: MeasurementRecord) -> Result<(), SinkError> {
        self.tx.send(record).await.map_err(|_| SinkError::Closed)
    }
}
