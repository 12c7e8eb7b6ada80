//! Knobs and hooks for a single probe.

use std::fmt;

use crate::error::ProbeError;

/// Buffer size used when [`ProbeOptions::buffer_size`] is unset or zero: 1 MiB.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;
type DebugFn = Box<dyn Fn(&str) + Send + Sync>;

/// Optional settings for [`crate::probe`]. Everything defaults to "off".
#[derive(Default)]
pub struct ProbeOptions {
    /// Size of each chunk written and read back. `None` or zero means [`DEFAULT_BUFFER_SIZE`].
    pub buffer_size: Option<usize>,

    /// Seed for the payload generator. Without one, each probe seeds from OS entropy.
    pub seed: Option<u64>,

    on_write: Option<ProgressFn>,
    on_read: Option<ProgressFn>,
    on_debug: Option<DebugFn>,
}

impl ProbeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Called after every buffer written with `(bytes written so far, planned total)`.
    pub fn on_write(mut self, f: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        self.on_write = Some(Box::new(f));
        self
    }

    /// Called after every buffer read back with `(bytes read so far, planned total)`.
    pub fn on_read(mut self, f: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        self.on_read = Some(Box::new(f));
        self
    }

    /// Receives a line of diagnostic text at each milestone of the probe.
    pub fn on_debug(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_debug = Some(Box::new(f));
        self
    }

    pub fn effective_buffer_size(&self) -> usize {
        match self.buffer_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_BUFFER_SIZE,
        }
    }

    pub(crate) fn report_write(&self, done: u64, total: u64) {
        if let Some(f) = &self.on_write {
            f(done, total);
        }
    }

    pub(crate) fn report_read(&self, done: u64, total: u64) {
        if let Some(f) = &self.on_read {
            f(done, total);
        }
    }

    pub(crate) fn debug(&self, message: &str) {
        tracing::debug!("{message}");
        if let Some(f) = &self.on_debug {
            f(message);
        }
    }
}

impl fmt::Debug for ProbeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeOptions")
            .field("buffer_size", &self.buffer_size)
            .field("seed", &self.seed)
            .field("on_write", &self.on_write.is_some())
            .field("on_read", &self.on_read.is_some())
            .field("on_debug", &self.on_debug.is_some())
            .finish()
    }
}

/// How many buffers each pass moves, and what that adds up to.
///
/// Both passes run while the running byte count is `<=` the requested size, so they always
/// cover one buffer past the last whole buffer of the request. That makes a request of zero
/// bytes probe exactly one buffer, and guarantees the total tested is never below the
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Plan {
    pub buffer_size: usize,
    pub iterations: u64,
    pub total_bytes: u64,
}

impl Plan {
    pub(crate) fn new(target_bytes: u64, buffer_size: usize) -> Result<Self, ProbeError> {
        let too_large = || ProbeError::TooLarge {
            target_bytes,
            buffer_size,
        };
        let step = u64::try_from(buffer_size).map_err(|_| too_large())?;
        let iterations = (target_bytes / step).checked_add(1).ok_or_else(too_large)?;
        let total_bytes = iterations.checked_mul(step).ok_or_else(too_large)?;
        Ok(Self {
            buffer_size,
            iterations,
            total_bytes,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Plan, ProbeOptions, DEFAULT_BUFFER_SIZE};
    use crate::error::ProbeError;
    use std::sync::{Arc, Mutex};

    #[test]
    fn zero_buffer_size_means_default() {
        assert_eq!(
            ProbeOptions::new().effective_buffer_size(),
            DEFAULT_BUFFER_SIZE
        );
        assert_eq!(
            ProbeOptions::new()
                .with_buffer_size(0)
                .effective_buffer_size(),
            DEFAULT_BUFFER_SIZE
        );
        assert_eq!(
            ProbeOptions::new()
                .with_buffer_size(512)
                .effective_buffer_size(),
            512
        );
    }

    #[test]
    fn plan_covers_an_extra_buffer() {
        assert_eq!(
            Plan::new(0, 512).unwrap(),
            Plan {
                buffer_size: 512,
                iterations: 1,
                total_bytes: 512
            }
        );
        assert_eq!(Plan::new(1, 512).unwrap().total_bytes, 512);
        assert_eq!(Plan::new(1025, 512).unwrap().total_bytes, 1536);
        assert_eq!(Plan::new(1024, 512).unwrap().iterations, 3);
        assert_eq!(Plan::new(1024, 512).unwrap().total_bytes, 1536);
    }

    #[test]
    fn plan_never_below_request() {
        for target in [0, 1, 511, 512, 513, 4096, 1_000_000] {
            for buffer in [1, 7, 512, 4096] {
                let plan = Plan::new(target, buffer).unwrap();
                assert!(plan.total_bytes >= target);
                assert_eq!(plan.total_bytes, plan.iterations * buffer as u64);
            }
        }
    }

    #[test]
    fn plan_rejects_overflow() {
        assert!(matches!(
            Plan::new(u64::MAX, 4096),
            Err(ProbeError::TooLarge { .. })
        ));
        assert!(matches!(
            Plan::new(u64::MAX, 1),
            Err(ProbeError::TooLarge { .. })
        ));
        assert_eq!(Plan::new(u64::MAX - 1, 1).unwrap().iterations, u64::MAX);
    }

    #[test]
    fn absent_hooks_are_noops() {
        let options = ProbeOptions::new();
        options.report_write(1, 2);
        options.report_read(1, 2);
        options.debug("nothing listens");
    }

    #[test]
    fn hooks_receive_calls() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let options = ProbeOptions::new()
            .on_write({
                let seen = seen.clone();
                move |done, total| seen.lock().unwrap().push(format!("w {done}/{total}"))
            })
            .on_debug({
                let seen = seen.clone();
                move |msg| seen.lock().unwrap().push(msg.to_string())
            });
        options.report_write(512, 1024);
        options.report_read(512, 1024);
        options.debug("hello");
        assert_eq!(*seen.lock().unwrap(), vec!["w 512/1024", "hello"]);
    }
}
