//! Random payload for the write pass.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Fills buffers with random bytes from a generator owned by one probe.
///
/// The content is never interpreted; only its checksum has to survive the round trip.
pub(crate) struct PayloadGenerator {
    rng: ChaCha8Rng,
}

impl PayloadGenerator {
    /// A generator that produces the same byte stream for the same seed.
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub(crate) fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub(crate) fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub(crate) fn fill(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}
