//! Versioned persistence of configurations.
//!
//! A stored configuration is a JSON array of two elements: the format
//! version and the durable state of the configuration. Memoized argument
//! values are not part of the durable state.
//!
//! Decoding reads the version first. A version other than
//! [`FORMAT_VERSION`] is not fatal, decoding continues and the returned
//! [`Decoded`] carries a [`VersionMismatch`] warning.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::Result;

/// Version written by this build.
pub const FORMAT_VERSION: u32 = 2;

/// A type with a durable state that can be stored and restored.
pub trait Persist: Sized {
    type State: Serialize + DeserializeOwned;

    /// A copy of everything that survives a store/load cycle.
    fn state(&self) -> Self::State;

    /// Rebuild from a stored state.
    ///
    /// Implementations start from their normal initializer and overlay the
    /// stored fields.
    fn restore(state: Self::State) -> Self;
}

/// The stored format version differs from [`FORMAT_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "configuration was stored with format version {found}, expected version {expected}, results may be inconsistent"
)]
pub struct VersionMismatch {
    pub found: u32,
    pub expected: u32,
}

/// A decoded value and the version warning, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub mismatch: Option<VersionMismatch>,
}

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            mismatch: self.mismatch,
        }
    }
}

pub fn encode<T: Persist>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&(FORMAT_VERSION, value.state()))?)
}

pub fn decode<T: Persist>(bytes: &[u8]) -> Result<Decoded<T>> {
    let stored: (u32, serde_json::Value) = serde_json::from_slice(bytes)?;
    restore(stored)
}

/// Write `value` to a new file at `path`, replacing an existing one.
pub fn store<T: Persist>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &(FORMAT_VERSION, value.state()))?;
    writer.flush()?;
    debug!(path = %path.display(), "stored configuration");
    Ok(())
}

pub fn load<T: Persist>(path: impl AsRef<Path>) -> Result<Decoded<T>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let stored: (u32, serde_json::Value) = serde_json::from_reader(reader)?;
    debug!(path = %path.display(), version = stored.0, "loaded configuration");
    restore(stored)
}

fn restore<T: Persist>((version, state): (u32, serde_json::Value)) -> Result<Decoded<T>> {
    let mismatch = (version != FORMAT_VERSION).then(|| {
        let mismatch = VersionMismatch {
            found: version,
            expected: FORMAT_VERSION,
        };
        warn!("{mismatch}");
        mismatch
    });
    let state = serde_json::from_value(state)?;
    Ok(Decoded {
        value: T::restore(state),
        mismatch,
    })
}
