//! The ways a capacity probe can end without verifying anything.

use std::{io, path::PathBuf};

/// Errors returned by [`crate::probe`].
///
/// [`ProbeError::ChecksumMismatch`] is the only variant meaning "the volume failed the check";
/// every other variant means the check could not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("could not create a probe file in {dir:?}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write failed at offset {offset}")]
    Write {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("could not persist the probe file to stable storage")]
    Sync(#[source] io::Error),

    #[error("could not rewind the probe file")]
    Seek(#[source] io::Error),

    /// Also covers short reads: the probe always expects whole buffers back.
    #[error("read failed at offset {offset}")]
    Read {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("checksum failed: capacity may not be truthful (wrote {expected:#010x}, read back {actual:#010x})")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("probe was cancelled")]
    Cancelled,

    #[error("{target_bytes} bytes in {buffer_size}-byte buffers does not fit in a 64-bit byte count")]
    TooLarge { target_bytes: u64, buffer_size: usize },
}

impl ProbeError {
    /// True if both passes completed but the data did not survive the round trip.
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, ProbeError::ChecksumMismatch { .. })
    }
}
