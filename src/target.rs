//! Where the probe writes its payload and reads it back from.

use std::{
    fs::File,
    io::{self, Read, Seek, Write},
};

/// A seekable byte store that can be forced to stable storage.
///
/// The temporary probe file is the real implementation; the passes only need this much of
/// it, which also lets them run against in-memory stores.
pub trait ProbeTarget: Read + Write + Seek {
    /// Flush buffered writes and wait until the data is durable.
    fn sync(&mut self) -> io::Result<()>;
}

impl ProbeTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl ProbeTarget for io::Cursor<Vec<u8>> {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}
