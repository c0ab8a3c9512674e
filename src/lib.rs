//! `econ-calendar-feed` library crate.
//!
//! The binary (`econcal`) is a thin wrapper around this library so that:
//!
//! - the fetch/normalize/write pipeline is testable without spawning processes
//! - the normalizer can be reused on feed bodies from other sources

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod schedule;
