//! Incremental checksums over each pass.

use std::fmt;

use crc32fast::Hasher;

/// A CRC-32 (IEEE) fed one buffer at a time, plus the number of bytes it has seen.
#[derive(Clone, Default)]
pub struct RunningDigest {
    hasher: Hasher,
    bytes: u64,
}

impl RunningDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, buf: &[u8]) {
        self.hasher.update(buf);
        self.bytes += buf.len() as u64;
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn value(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl fmt::Debug for RunningDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningDigest")
            .field("value", &format_args!("{:#010x}", self.value()))
            .field("bytes", &self.bytes)
            .finish()
    }
}
