//! Host files standing in for a device's EEPROM.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result};
use nvsettings::adapters::ERASED_BYTE;
use nvsettings::domain::ByteStore;

/// Default image size, matching the 2047-byte emulated EEPROM of Particle
/// Photon/Electron devices.
pub const DEFAULT_CAPACITY: usize = 2047;

/// A fixed-size EEPROM image on disk.
///
/// The capacity is the file length at open time; writes never grow the file.
pub struct ImageFile {
    file: File,
    capacity: usize,
}

impl ImageFile {
    /// Create a blank (erased) image of `capacity` bytes.
    ///
    /// Fails if the file already exists, unless `overwrite` is set.
    pub fn create(path: &Path, capacity: usize, overwrite: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to create image {}", path.display()))?;

        file.write_all(&vec![ERASED_BYTE; capacity])
            .with_context(|| format!("Failed to erase image {}", path.display()))?;
        file.flush()?;
        log::info!("Created {} byte image {}", capacity, path.display());

        Ok(Self { file, capacity })
    }

    /// Open an existing image for reading and writing.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?;
        let capacity = file.metadata()?.len();
        let capacity = usize::try_from(capacity)
            .with_context(|| format!("Image {} is too large", path.display()))?;
        log::debug!("Opened {} ({} bytes)", path.display(), capacity);

        Ok(Self { file, capacity })
    }

    fn seek_checked(&mut self, address: u32, len: usize) -> io::Result<()> {
        let end = (address as usize).checked_add(len);
        if !end.is_some_and(|end| end <= self.capacity) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "access of {} bytes at {:#06x} exceeds image size {}",
                    len, address, self.capacity
                ),
            ));
        }
        self.file.seek(SeekFrom::Start(u64::from(address)))?;
        Ok(())
    }
}

impl ByteStore for ImageFile {
    type Error = io::Error;

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&mut self, address: u32, dest: &mut [u8]) -> io::Result<()> {
        self.seek_checked(address, dest.len())?;
        self.file.read_exact(dest)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> io::Result<()> {
        self.seek_checked(address, src.len())?;
        self.file.write_all(src)?;
        self.file.flush()
    }
}
