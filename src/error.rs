// src/error.rs

//! Errors surfaced by the replication engine.

use thiserror::Error;

/// Code reported to observers when no pool holds any file.
pub const NO_SOURCE_FILES_CODE: i32 = -1;

/// The only failure the engine reports outward. Copy failures are absorbed
/// by the engine and never show up here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Every source pool is empty.
    #[error("no source files configured for generation")]
    NoSourceFiles,
}

impl EngineError {
    /// Numeric code handed to presentation layers.
    pub fn code(&self) -> i32 {
        match self {
            EngineError::NoSourceFiles => NO_SOURCE_FILES_CODE,
        }
    }

    /// Message shown to the user in the blocking notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            EngineError::NoSourceFiles => "No sample files selected for generation!",
        }
    }
}
