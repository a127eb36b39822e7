//! Boot, edit, save, reboot against a 64-byte EEPROM.

use nvsettings::adapters::RamStore;
use nvsettings::domain::{
    AllocatorConfig, ByteStore, EncodeError, LoadOutcome, ObjectState, Payload, PayloadReader,
    PayloadWriter, RECORD_MAGIC, RegionAllocator, SaveOutcome, SchemaVersion, SettingsManager,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Display {
    brightness: u16,
    mode: u8,
}

impl Payload for Display {
    const SIZE: usize = 8;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        let mut w = PayloadWriter::new(out);
        w.put(&self.brightness)?;
        w.put(&self.mode)?;
        w.pad(5)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let mut r = PayloadReader::new(bytes);
        let value = Self {
            brightness: r.get()?,
            mode: r.get()?,
        };
        r.skip(5)?;
        Some(value)
    }
}

const DEFAULTS: Display = Display {
    brightness: 128,
    mode: 0,
};

type DisplaySettings = SettingsManager<Display, 32>;

/// Everything the firmware does at startup: build the layout, bind the slot.
fn boot(store: &RamStore<64>) -> anyhow::Result<DisplaySettings> {
    let mut allocator = RegionAllocator::<4>::for_store(store, AllocatorConfig::default());
    let manager =
        DisplaySettings::register(&mut allocator, "cfg", SchemaVersion::new(1), DEFAULTS)?;
    Ok(manager)
}

#[test]
fn test_first_boot_then_restart() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut eeprom = RamStore::<64>::new();

    // first boot on blank memory
    let mut settings = boot(&eeprom)?;
    assert_eq!(settings.region().base().value(), 0);
    assert_eq!(settings.load(&mut eeprom)?, LoadOutcome::DefaultedMissing);
    assert_eq!(*settings.get(), DEFAULTS);

    settings.update(|d| d.brightness = 200);
    assert_eq!(settings.save(&mut eeprom)?, SaveOutcome::Written);
    assert_eq!(settings.stats().writes, 1);
    drop(settings);

    // header and payload sit at the slot's base address, rest untouched
    assert_eq!(&eeprom.as_bytes()[..2], &RECORD_MAGIC);
    assert_eq!(&eeprom.as_bytes()[10..13], &[200, 0, 0]);
    assert!(eeprom.as_bytes()[18..].iter().all(|&b| b == 0xFF));

    // restart with the same memory
    let mut settings = boot(&eeprom)?;
    assert_eq!(settings.load(&mut eeprom)?, LoadOutcome::FromStorage);
    assert_eq!(settings.state(), ObjectState::Loaded);
    assert_eq!(
        *settings.get(),
        Display {
            brightness: 200,
            mode: 0
        }
    );
    Ok(())
}

#[test]
fn test_defaulted_state_survives_save() -> anyhow::Result<()> {
    let mut eeprom = RamStore::<64>::new();
    let mut settings = boot(&eeprom)?;

    settings.load(&mut eeprom)?;
    settings.save(&mut eeprom)?;

    // the slot now holds valid data, but this boot's copy came from defaults
    assert_eq!(settings.state(), ObjectState::Defaulted);
    assert!(settings.verify(&mut eeprom)?.is_ok());
    Ok(())
}

#[test]
fn test_layout_is_deterministic_across_boots() -> anyhow::Result<()> {
    let eeprom = RamStore::<64>::new();
    let layout = |store: &RamStore<64>| -> anyhow::Result<Vec<u32>> {
        let mut allocator = RegionAllocator::<4>::for_store(store, AllocatorConfig::default());
        let a = SettingsManager::<u32, 16>::register(&mut allocator, "a", SchemaVersion::new(1), 0)?;
        let b = DisplaySettings::register(&mut allocator, "b", SchemaVersion::new(1), DEFAULTS)?;
        let c = SettingsManager::<u8, 16>::register(&mut allocator, "c", SchemaVersion::new(1), 0)?;
        Ok(vec![
            a.region().base().value(),
            b.region().base().value(),
            c.region().base().value(),
        ])
    };

    assert_eq!(layout(&eeprom)?, vec![0, 14, 32]);
    assert_eq!(layout(&eeprom)?, layout(&eeprom)?);
    Ok(())
}

#[test]
fn test_slot_that_does_not_fit_is_rejected() -> anyhow::Result<()> {
    let eeprom = RamStore::<64>::new();
    let mut allocator = RegionAllocator::<4>::for_store(&eeprom, AllocatorConfig::default());

    DisplaySettings::register(&mut allocator, "a", SchemaVersion::new(1), DEFAULTS)?;
    DisplaySettings::register(&mut allocator, "b", SchemaVersion::new(1), DEFAULTS)?;
    DisplaySettings::register(&mut allocator, "c", SchemaVersion::new(1), DEFAULTS)?;
    let fourth = DisplaySettings::register(&mut allocator, "d", SchemaVersion::new(1), DEFAULTS);

    let err = fourth.unwrap_err();
    assert!(err.to_string().contains("Slot(d)"));
    assert_eq!(allocator.remaining(), 64 - 3 * 18);
    assert_eq!(eeprom.capacity(), 64);
    Ok(())
}
