//! Settings on NOR flash through `RmwNorFlashStorage`.

use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash, RmwNorFlashStorage,
};
use nvsettings::adapters::StorageAdapter;
use nvsettings::domain::{
    AllocatorConfig, LoadOutcome, RegionAllocator, SaveOutcome, SchemaVersion, SettingsManager,
};

const SECTOR_SIZE: usize = 256;
const SECTORS: usize = 4;

struct MockFlash {
    data: [[u8; SECTOR_SIZE]; SECTORS],
    erases: usize,
}

impl MockFlash {
    fn new() -> Self {
        Self {
            data: [[0xFF; SECTOR_SIZE]; SECTORS],
            erases: 0,
        }
    }
}

#[derive(Debug)]
struct MockFlashError;

impl NorFlashError for MockFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

impl ErrorType for MockFlash {
    type Error = MockFlashError;
}

impl ReadNorFlash for MockFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let sector = offset as usize / SECTOR_SIZE;
        let at = offset as usize % SECTOR_SIZE;
        if sector < SECTORS && at + bytes.len() <= SECTOR_SIZE {
            bytes.copy_from_slice(&self.data[sector][at..at + bytes.len()]);
            Ok(())
        } else {
            Err(MockFlashError)
        }
    }

    fn capacity(&self) -> usize {
        SECTORS * SECTOR_SIZE
    }
}

impl NorFlash for MockFlash {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let first = from as usize / SECTOR_SIZE;
        let last = (to as usize).div_ceil(SECTOR_SIZE);
        for sector in first..last.min(SECTORS) {
            self.data[sector] = [0xFF; SECTOR_SIZE];
            self.erases += 1;
        }
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let sector = offset as usize / SECTOR_SIZE;
        let at = offset as usize % SECTOR_SIZE;
        if sector < SECTORS && at + bytes.len() <= SECTOR_SIZE {
            // NOR can only clear bits
            for (cell, &b) in self.data[sector][at..at + bytes.len()].iter_mut().zip(bytes) {
                *cell &= b;
            }
            Ok(())
        } else {
            Err(MockFlashError)
        }
    }
}

#[test]
fn test_settings_on_nor_flash() {
    let mut merge_buffer = [0u8; SECTOR_SIZE];
    let flash = RmwNorFlashStorage::new(MockFlash::new(), &mut merge_buffer);
    let mut store = StorageAdapter::new(flash);

    // start in the second sector
    let config = AllocatorConfig::new(SECTOR_SIZE as u32);
    let mut allocator = RegionAllocator::<2>::for_store(&store, config);
    let mut counter =
        SettingsManager::<u32, 14>::register(&mut allocator, "boots", SchemaVersion::new(3), 0)
            .unwrap();

    assert_eq!(
        counter.load(&mut store).unwrap(),
        LoadOutcome::DefaultedMissing
    );

    // rewriting in place needs the read-modify-erase-write cycle
    for boot in 1..=3u32 {
        counter.update(|c| *c = boot);
        assert_eq!(counter.save(&mut store).unwrap(), SaveOutcome::Written);
    }
    assert_eq!(counter.save(&mut store).unwrap(), SaveOutcome::Unchanged);
    drop(counter);

    let mut allocator = RegionAllocator::<2>::for_store(&store, config);
    let mut counter =
        SettingsManager::<u32, 14>::register(&mut allocator, "boots", SchemaVersion::new(3), 0)
            .unwrap();
    assert_eq!(counter.load(&mut store).unwrap(), LoadOutcome::FromStorage);
    assert_eq!(*counter.get(), 3);
}

#[test]
fn test_out_of_range_is_rejected_by_adapter() {
    use nvsettings::domain::ByteStore;

    let mut merge_buffer = [0u8; SECTOR_SIZE];
    let flash = RmwNorFlashStorage::new(MockFlash::new(), &mut merge_buffer);
    let mut store = StorageAdapter::new(flash);

    let capacity = store.capacity() as u32;
    assert!(store.write(capacity - 1, &[0, 0]).is_err());
    assert!(store.write(capacity - 2, &[0, 0]).is_ok());
}
