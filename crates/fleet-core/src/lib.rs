//! Core types, errors, and configuration for the fleet word scanner.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types ([`FileDescriptor`], [`WordTally`], [`AggregationResult`])
//! - Configuration structures ([`Config`] and its sections)
//! - Error types for configuration validation
//! - The `FxHashMap` alias used for word tallies

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{AggregateConfig, Config, ShellConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, fx_hash_map, fx_hash_map_with_capacity};
pub use types::{AggregationResult, FileDescriptor, WordTally};
