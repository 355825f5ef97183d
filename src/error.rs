//! Error types for quickdemo.
//!
//! These are errors of the harness itself. Errors raised by a demonstrated
//! function are plain values ([`Raised`](crate::target::Raised)) and never
//! show up here.

use std::io;

use thiserror::Error;

use crate::kind::Kind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("the kind to expect is not an error kind: {0}")]
    NotAnErrorKind(Kind),

    #[error("no target functions to run, register functions or groups first")]
    NoTargets,

    #[error("name '{0}' is not defined")]
    Unbound(String),

    #[error("test failed and exit on test failure is active (status {code})")]
    ExitRequested { code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode or decode a stored configuration: {0}")]
    Codec(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error stops a run because a failure escalated to an exit.
    pub fn is_exit(&self) -> bool {
        matches!(self, Error::ExitRequested { .. })
    }
}
