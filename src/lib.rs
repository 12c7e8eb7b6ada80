//! Verify that a volume really holds as much data as it claims.
//!
//! [`probe`] writes a stream of random data into a temporary file on the volume, forces it
//! to stable storage, reads it back and compares CRC-32 checksums of both passes. Counterfeit
//! flash media that wraps around or drops writes past its real size fails that comparison
//! with [`ProbeError::ChecksumMismatch`].

mod cancel;
mod digest;
mod error;
mod generator;
mod options;
mod probe;
pub mod size;
mod target;

pub use crate::cancel::CancelToken;
pub use crate::digest::RunningDigest;
pub use crate::error::ProbeError;
pub use crate::options::{ProbeOptions, DEFAULT_BUFFER_SIZE};
pub use crate::probe::{probe, probe_dirs, ProbeReport, PROBE_FILE_PREFIX};
