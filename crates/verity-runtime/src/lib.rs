//! # verity-runtime
//!
//! Pipeline orchestration for provider record verification.
//!
//! `verity-core` decides; this crate wires the decision to its
//! collaborators:
//! - a [`RecordSource`] that supplies reference and observed records
//! - an [`ActionSink`] that persists verified records or queues flagged ones
//!
//! The shipped implementations are a YAML fixture table and a logging sink.
//! Database, scraper, and review-queue integrations plug in behind the same
//! traits.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verity_runtime::{FixtureSource, LogSink, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .source(Arc::new(FixtureSource::builtin()?))
//!     .sink(Arc::new(LogSink::new()))
//!     .build()?;
//!
//! let run = pipeline.run(1003).await?;
//! println!("{} ({})", run.message, run.assessment.confidence);
//! ```

pub mod pipeline;
pub mod sink;
pub mod source;

pub use pipeline::{Pipeline, PipelineBuilder, PipelineError, PipelineRun, Step};
pub use sink::{ActionSink, LogSink, SinkError};
pub use source::{Fixture, FixtureSource, RecordSource, ReferenceRecord, SourceError};
