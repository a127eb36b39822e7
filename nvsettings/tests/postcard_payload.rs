//! Serde types stored through `Postcard<T, N>`.

use nvsettings::adapters::RamStore;
use nvsettings::domain::{
    AllocatorConfig, EncodeError, LoadOutcome, Payload, Postcard, RegionAllocator,
    SchemaVersion, SettingsManager, StoreError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Mode {
    Off,
    Eco { level: u8 },
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Heater {
    mode: Mode,
    setpoint_c: i16,
    schedule: [u8; 4],
}

type HeaterPayload = Postcard<Heater, 24>;

fn defaults() -> HeaterPayload {
    Postcard(Heater {
        mode: Mode::Off,
        setpoint_c: 20,
        schedule: [6, 9, 17, 22],
    })
}

fn manager(eeprom: &RamStore<64>) -> SettingsManager<HeaterPayload, 34> {
    let mut allocator = RegionAllocator::<2>::for_store(eeprom, AllocatorConfig::default());
    SettingsManager::register(&mut allocator, "heater", SchemaVersion::new(1), defaults()).unwrap()
}

#[test]
fn test_postcard_roundtrip_through_store() {
    let mut eeprom = RamStore::<64>::new();

    let mut heater = manager(&eeprom);
    assert_eq!(heater.load(&mut eeprom).unwrap(), LoadOutcome::DefaultedMissing);
    heater.update(|h| {
        h.mode = Mode::Eco { level: 2 };
        h.setpoint_c = -5;
    });
    heater.close(&mut eeprom).unwrap();

    let mut heater = manager(&eeprom);
    assert_eq!(heater.load(&mut eeprom).unwrap(), LoadOutcome::FromStorage);
    assert_eq!(heater.get().mode, Mode::Eco { level: 2 });
    assert_eq!(heater.get().setpoint_c, -5);
    assert_eq!(heater.get().schedule, [6, 9, 17, 22]);
}

#[test]
fn test_encoding_is_zero_padded() {
    let mut buf = [0xAAu8; 24];
    Postcard::<_, 24>(Mode::Full).encode(&mut buf).unwrap();
    assert_eq!(buf[0], 2);
    assert!(buf[1..].iter().all(|&b| b == 0));
}

#[test]
fn test_value_too_large_for_slot() {
    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Blob([u32; 8]);

    let mut buf = [0u8; 8];
    let result = Postcard::<_, 8>(Blob([u32::MAX; 8])).encode(&mut buf);
    assert_eq!(result, Err(EncodeError::Serialize));

    let mut eeprom = RamStore::<64>::new();
    let mut allocator = RegionAllocator::<2>::for_store(&eeprom, AllocatorConfig::default());
    let mut blob = SettingsManager::<Postcard<Blob, 8>, 18>::register(
        &mut allocator,
        "blob",
        SchemaVersion::new(1),
        Postcard(Blob([0; 8])),
    )
    .unwrap();
    blob.update(|b| b.0 = [u32::MAX; 8]);
    assert!(matches!(
        blob.close(&mut eeprom),
        Err(StoreError::Encode(EncodeError::Serialize))
    ));
}

#[test]
fn test_undecodable_bytes_default() {
    let mut eeprom = RamStore::<64>::new();
    {
        let mut allocator = RegionAllocator::<2>::for_store(&eeprom, AllocatorConfig::default());
        let mut raw = SettingsManager::<[u8; 24], 34>::register(
            &mut allocator,
            "heater",
            SchemaVersion::new(1),
            [0; 24],
        )
        .unwrap();
        // enum discriminant 9 does not exist
        raw.update(|b| b[0] = 9);
        raw.close(&mut eeprom).unwrap();
    }

    let mut heater = manager(&eeprom);
    assert_eq!(
        heater.load(&mut eeprom).unwrap(),
        LoadOutcome::DefaultedLayoutMismatch
    );
    assert_eq!(*heater.get(), defaults());
}
