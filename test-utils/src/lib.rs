//! Shared test utilities for mongo-testbed crates.
//!
//! This crate provides:
//! - Proptest generators for bootstrap domain types
//! - A recording mock of the administrative command surface
//! - Test fixtures with sample data

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
