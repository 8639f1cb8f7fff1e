//! Error types for the Galaxy NN compute layer
//!
//! This module defines the error types used throughout the crate,
//! including device initialization, pipeline creation and cache resolution.

use std::fmt;

/// Result type for Galaxy NN operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy NN errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (a device API call reported non-success)
    BackendError(String),

    /// Out of host or device memory
    OutOfMemory,

    /// Invalid resource (shader bytecode, shader index, orientation, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// The specialization list does not match the shader's declared constants
    SpecializationMismatch {
        /// Count declared by the compiled shader
        expected: u32,
        /// Count supplied by the caller
        got: u32,
    },

    /// The pipeline cache (or its compiler backend) could not resolve a request
    CacheResolution(String),

    /// Operation not allowed in the object's current lifecycle state
    InvalidState(String),
}

impl Error {
    /// Negative status code for callers that speak integer statuses
    ///
    /// Every error kind maps to a distinct negative value; success is
    /// represented by `0` on the caller side.
    pub fn status_code(&self) -> i32 {
        match self {
            Error::BackendError(_) => -1,
            Error::OutOfMemory => -2,
            Error::InvalidResource(_) => -3,
            Error::InitializationFailed(_) => -4,
            Error::SpecializationMismatch { .. } => -5,
            Error::CacheResolution(_) => -6,
            Error::InvalidState(_) => -7,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::SpecializationMismatch { expected, got } => write!(
                f,
                "Specialization count mismatch: expected {} but got {}",
                expected, got
            ),
            Error::CacheResolution(msg) => write!(f, "Pipeline cache resolution failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
