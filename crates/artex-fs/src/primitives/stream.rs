use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// One mebibyte, the read size used when pulling bytes out of an image.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug)]
pub struct CopyOptions {
    chunk_size: usize,
    create_parent: bool,
}

impl Default for CopyOptions {
    fn default() -> Self { Self::new() }
}

impl CopyOptions {
    pub fn new() -> Self {
        Self {
            chunk_size:    DEFAULT_CHUNK_SIZE,
            create_parent: true,
        }
    }

    /// Zero is clamped to one byte.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn create_parent(mut self, create_parent: bool) -> Self {
        self.create_parent = create_parent;
        self
    }
}

/// Stream `reader` into a freshly created file at `dest`, one chunk at a time.
///
/// Returns the number of bytes written. The destination file is closed on
/// every exit path. If reading or writing fails after the file was created,
/// the partial file is removed, so a failed copy leaves nothing behind.
pub fn copy_stream<R: Read + ?Sized>(
    reader: &mut R,
    dest: impl AsRef<Path>,
    options: CopyOptions,
) -> Result<u64> {
    let dest = dest.as_ref();
    if options.create_parent {
        super::dir::ensure_parent(dest)?;
    }

    let mut file = File::create(dest).map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    match pump(reader, &mut file, dest, options.chunk_size) {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(dest);
            Err(e)
        }
    }
}

fn pump<R: Read + ?Sized>(
    reader: &mut R,
    file: &mut File,
    dest: &Path,
    chunk_size: usize,
) -> Result<u64> {
    let mut buffer = vec![0u8; chunk_size];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::Read {
                    path: dest.to_path_buf(),
                    source: e,
                });
            }
        };
        file.write_all(&buffer[..n]).map_err(|e| Error::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
        written += n as u64;
    }

    file.flush().map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    Ok(written)
}
