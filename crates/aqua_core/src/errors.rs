//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! [`AquaError`] is the umbrella error covering configuration, I/O and
//! runtime failures. [`LoadError`] is the narrower error produced by asset
//! loaders; it converts into [`AquaError`] with `?`.
//!
//! Being unplaced is never an error: a creature whose load failed or never
//! resolved simply produces no transform.
//!
//! ```rust,ignore
//! use aqua_core::errors::{AquaError, Result};
//!
//! fn parse(text: &str) -> Result<u32> {
//!     text.parse().map_err(|_| AquaError::InvalidConfig("not a number".into()))
//! }
//! ```

use thiserror::Error;

/// Failure reported by an asset loader.
///
/// Loaders log and return these; the affected creature stays unplaced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The asset reference does not resolve to anything the loader knows.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Reading the asset's bytes failed.
    #[error("Asset I/O error for {source_ref}: {message}")]
    Io {
        /// The asset reference being read
        source_ref: String,
        /// Underlying error description
        message: String,
    },

    /// The bytes were read but could not be decoded into a scene.
    #[error("Asset decode error for {source_ref}: {message}")]
    Decode {
        /// The asset reference being decoded
        source_ref: String,
        /// Decoder message
        message: String,
    },

    /// The loader task was dropped before it produced a result.
    #[error("Asset load cancelled: {0}")]
    Cancelled(String),
}

/// The main error type for the Aquarium engine.
#[derive(Error, Debug)]
pub enum AquaError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// An asset failed to load.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of range or contradictory.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // I/O & Runtime Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The async loader runtime could not be started.
    #[error("Loader runtime error: {0}")]
    RuntimeError(String),

    /// A creature key no longer refers to a live creature.
    #[error("Unknown creature: {0}")]
    UnknownCreature(String),
}

/// Alias for `Result<T, AquaError>`.
pub type Result<T> = std::result::Result<T, AquaError>;
