//! Write a temporary file full of random data, read it back, and compare checksums.

use std::{
    io::{Seek, SeekFrom},
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::{
    cancel::CancelToken,
    error::ProbeError,
    generator::PayloadGenerator,
    options::{Plan, ProbeOptions},
    read_test, write_test,
    target::ProbeTarget,
};

/// Every probe file starts with this, followed by a random suffix.
pub const PROBE_FILE_PREFIX: &str = "capacitycheck-";

/// What a successful probe verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// The size the caller asked to verify.
    pub target_bytes: u64,
    /// Size of every chunk written and read.
    pub buffer_size: usize,
    /// Bytes written to the probe file; at least `target_bytes`.
    pub bytes_written: u64,
    /// Bytes read back; always equal to `bytes_written` on success.
    pub bytes_read: u64,
    /// CRC-32 shared by both passes.
    pub checksum: u32,
}

/// Checks that the volume holding `dir` can store at least `target_bytes` bytes and give
/// them back unchanged.
///
/// A uniquely named temporary file is created in `dir` and removed again before this
/// returns, whatever the outcome. Fails with [`ProbeError::ChecksumMismatch`] when the data
/// read back differs from what was written.
#[tracing::instrument(skip(cancel, options), fields(buffer_size = options.effective_buffer_size()))]
pub fn probe(
    cancel: &CancelToken,
    target_bytes: u64,
    dir: &Path,
    options: &ProbeOptions,
) -> Result<ProbeReport, ProbeError> {
    let plan = Plan::new(target_bytes, options.effective_buffer_size())?;

    let mut file = tempfile::Builder::new()
        .prefix(PROBE_FILE_PREFIX)
        .tempfile_in(dir)
        .map_err(|source| {
            options.debug(&format!("temp file creation failed: {source}"));
            ProbeError::Create {
                dir: dir.to_path_buf(),
                source,
            }
        })?;
    options.debug(&format!("Created probe file {:?}", file.path()));

    let mut generator = PayloadGenerator::new(options.seed);
    let result = verify(
        file.as_file_mut(),
        &plan,
        &mut generator,
        cancel,
        options,
    );
    remove(file);

    let (expected, actual) = result?;
    if expected != actual {
        let message =
            format!("checksum validation failed. Expected [{expected}] Got [{actual}]");
        options.debug(&message);
        error!(?dir, expected, actual, "DATA INCONSISTENCIES DETECTED");
        return Err(ProbeError::ChecksumMismatch { expected, actual });
    }
    info!(?dir, checksum = expected, bytes = plan.total_bytes, "Probe passed");
    Ok(ProbeReport {
        target_bytes,
        buffer_size: plan.buffer_size,
        bytes_written: plan.total_bytes,
        bytes_read: plan.total_bytes,
        checksum: expected,
    })
}

/// Runs one independent probe per directory, in parallel.
///
/// `options_for` builds the options for each directory, so progress hooks can tell the
/// probes apart. Results come back in the order of `dirs`.
pub fn probe_dirs<P, F>(
    cancel: &CancelToken,
    target_bytes: u64,
    dirs: &[P],
    options_for: F,
) -> Vec<(PathBuf, Result<ProbeReport, ProbeError>)>
where
    P: AsRef<Path> + Sync,
    F: Fn(&Path) -> ProbeOptions + Sync,
{
    dirs.par_iter()
        .map(|dir| {
            let dir = dir.as_ref();
            let options = options_for(dir);
            (dir.to_path_buf(), probe(cancel, target_bytes, dir, &options))
        })
        .collect()
}

/// Both passes against an already-open target. Returns the (write, read) checksums.
pub(crate) fn verify(
    target: &mut impl ProbeTarget,
    plan: &Plan,
    generator: &mut PayloadGenerator,
    cancel: &CancelToken,
    options: &ProbeOptions,
) -> Result<(u32, u32), ProbeError> {
    let mut buf = vec![0; plan.buffer_size];

    options.debug("Beginning writing");
    let written = write_test::write(target, &mut buf, plan, generator, cancel, options)?;
    target.sync().map_err(ProbeError::Sync)?;
    options.debug(&format!(
        "Writing complete. Expected checksum: {}",
        written.value()
    ));

    target.seek(SeekFrom::Start(0)).map_err(ProbeError::Seek)?;

    options.debug("Beginning reading");
    let read = read_test::read_back(target, &mut buf, plan, cancel, options)?;
    Ok((written.value(), read.value()))
}

fn remove(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(error) = file.close() {
        warn!(%error, ?path, "Could not remove probe file");
    }
}
