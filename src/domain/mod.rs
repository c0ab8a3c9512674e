//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - feed rows and their impact labels (`RawEvent`, `Impact`, `Severity`)
//! - normalized outputs (`NormalizedRecord`, `DailyAggregate`)
//! - run-level documents and configuration (`RunMetadata`, `UpdateConfig`)

pub mod types;

pub use types::*;
