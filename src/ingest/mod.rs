//! Ingestion pipeline: aggregate a document's links, then persist them

mod aggregate;
mod engine;

pub use aggregate::{LinkBatch, LinkKey};
pub use engine::{IngestError, IngestReport, IngestResult, Ingestor};
