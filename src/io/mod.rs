//! Input/output helpers.
//!
//! - feed CSV ingest + normalization (`ingest`)
//! - series file export (`export`)
//! - metadata / descriptor JSON (`metadata`)

pub mod export;
pub mod ingest;
pub mod metadata;

pub use export::*;
pub use ingest::*;
pub use metadata::*;
