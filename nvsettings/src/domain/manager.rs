//! SettingsManager domain service - one typed settings object bound to a slot.
//!
//! The manager owns the RAM copy of the object. `load` pulls it from the
//! store once at startup, `update` edits it in RAM, and `save` writes the
//! whole record back, unless the encoded record matches what was last read or
//! written. After a failed write nothing is assumed about the slot, so the
//! next `save` always writes.
//!
//! Corruption never surfaces as an error: a record that is missing, torn, or
//! from another schema leaves the RAM copy at the defaults and reports why
//! through [`LoadOutcome`]. Errors are reserved for accesses outside the
//! store and for driver failures.

use crate::domain::{
    allocator::RegionAllocator,
    codec::{RecordHeader, decode_record, encode_record, inspect_record, record_len},
    entities::{LoadOutcome, ObjectState, SaveOutcome, SaveStats},
    error::{AllocError, DecodeError, EncodeError, StoreError},
    payload::Payload,
    ports::ByteStore,
    value_objects::{Region, SchemaVersion, SlotId},
};

/// Manager for one settings object of type `P`.
///
/// `N` is the size of the stack buffer used to stage a record and must be at
/// least `record_len(P::SIZE)`; a smaller `N` fails to compile.
///
/// The store is lent to each call rather than held, so several managers can
/// share one store without interior mutability.
///
/// # Examples
///
/// ```
/// use nvsettings::adapters::RamStore;
/// use nvsettings::domain::{
///     AllocatorConfig, LoadOutcome, RegionAllocator, SchemaVersion, SettingsManager,
/// };
///
/// let mut store = RamStore::<64>::new();
/// let mut allocator = RegionAllocator::<2>::for_store(&store, AllocatorConfig::default());
///
/// let mut volume = SettingsManager::<u16, 12>::register(
///     &mut allocator,
///     "volume",
///     SchemaVersion::new(1),
///     30,
/// )
/// .unwrap();
///
/// assert_eq!(volume.load(&mut store).unwrap(), LoadOutcome::DefaultedMissing);
/// volume.update(|v| *v = 45);
/// assert!(volume.save(&mut store).unwrap().is_written());
/// ```
pub struct SettingsManager<P: Payload + Clone, const N: usize> {
    region: Region,
    version: SchemaVersion,
    default: P,
    current: P,
    state: ObjectState,
    /// Checksum of the record known to be in the store, if any.
    last_written: Option<u32>,
    /// Checksum of the RAM copy as of the last load or successful save.
    baseline: Option<u32>,
    stats: SaveStats,
    drop_check: bool,
}

impl<P: Payload + Clone, const N: usize> SettingsManager<P, N> {
    /// Bytes one record of `P` occupies in the store.
    pub const RECORD_LEN: usize = record_len(P::SIZE);

    const LAYOUT_OK: () = {
        assert!(
            P::SIZE <= u16::MAX as usize,
            "payload does not fit the record length field"
        );
        assert!(N >= Self::RECORD_LEN, "record buffer N is smaller than the record");
    };

    /// Reserve a slot for this object and bind the manager to it.
    ///
    /// Slots must be registered in the same order on every boot.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the slot does not fit or is already
    /// registered.
    pub fn register<const M: usize>(
        allocator: &mut RegionAllocator<M>,
        slot: impl Into<SlotId>,
        version: SchemaVersion,
        default: P,
    ) -> Result<Self, AllocError> {
        let size = u32::try_from(Self::RECORD_LEN).unwrap_or(u32::MAX);
        let region = allocator.reserve(slot.into(), size)?;
        Ok(Self::with_region(region, version, default))
    }

    /// Bind the manager to a region reserved elsewhere.
    ///
    /// The region should be at least [`RECORD_LEN`](Self::RECORD_LEN) bytes;
    /// accesses are only checked against the store's capacity.
    pub fn with_region(region: Region, version: SchemaVersion, default: P) -> Self {
        let () = Self::LAYOUT_OK;
        debug_assert!(region.len() as usize >= Self::RECORD_LEN);

        let mut manager = Self {
            region,
            version,
            current: default.clone(),
            default,
            state: ObjectState::Uninitialized,
            last_written: None,
            baseline: None,
            stats: SaveStats::default(),
            drop_check: true,
        };
        manager.baseline = manager.current_checksum();
        manager
    }

    /// Load the object from the store.
    ///
    /// On any validation failure the RAM copy is reset to the defaults and
    /// the reason is returned; nothing is written.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the record does not fit the store, `Read` if the
    /// driver fails. The RAM copy and state are left untouched on error.
    pub fn load<S: ByteStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<LoadOutcome, StoreError<S::Error>> {
        self.load_or_migrate(store, |_, _| None)
    }

    /// Load the object, offering records from other schema versions to
    /// `migrate`.
    ///
    /// `migrate` receives the stored version and the checksum-verified
    /// payload bytes. Returning `Some` adopts the converted value as
    /// [`LoadOutcome::Migrated`]; the store still holds the old record until
    /// the next `save`. Returning `None` falls back to the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_or_migrate<S, F>(
        &mut self,
        store: &mut S,
        migrate: F,
    ) -> Result<LoadOutcome, StoreError<S::Error>>
    where
        S: ByteStore + ?Sized,
        F: FnOnce(SchemaVersion, &[u8]) -> Option<P>,
    {
        let mut buf = [0u8; N];
        let bytes = self.read_record(store, &mut buf)?;

        let outcome = match decode_record::<P>(bytes, self.version) {
            Ok((value, header)) => {
                self.current = value;
                self.last_written = Some(header.checksum);
                LoadOutcome::FromStorage
            }
            Err(err @ DecodeError::VersionMismatch { stored, .. }) => {
                let migrated = inspect_record(bytes)
                    .ok()
                    .and_then(|raw| migrate(raw.header.schema_version, raw.payload));
                match migrated {
                    Some(value) => {
                        self.current = value;
                        self.last_written = None;
                        LoadOutcome::Migrated { from: stored }
                    }
                    None => self.fall_back(err),
                }
            }
            Err(err) => self.fall_back(err),
        };

        self.state = outcome.into();
        self.baseline = self.current_checksum();
        debug!("Loaded {}: {}", self.region.slot(), outcome);
        Ok(outcome)
    }

    fn fall_back(&mut self, err: DecodeError) -> LoadOutcome {
        if err.is_corruption() {
            warn!("Record in {} is corrupt: {}", self.region.slot(), err);
        }
        self.current = self.default.clone();
        self.last_written = None;
        LoadOutcome::from(err)
    }

    /// Edit the RAM copy. Nothing is written until [`save`](Self::save).
    ///
    /// Returns whatever `f` returns, so fallible setters can report back.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.current)
    }

    /// The RAM copy.
    #[inline]
    pub fn get(&self) -> &P {
        &self.current
    }

    /// The defaults this manager falls back to.
    #[inline]
    pub fn defaults(&self) -> &P {
        &self.default
    }

    /// Where the RAM copy came from.
    #[inline]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// Check if the RAM copy was edited since the last load or successful
    /// save, or if the last write failed.
    ///
    /// Defaults or a migrated value adopted by `load` are not unsaved work;
    /// they are rebuilt the same way on the next boot.
    pub fn has_unsaved_changes(&self) -> bool {
        match (self.baseline, self.current_checksum()) {
            (Some(baseline), Some(current)) => baseline != current,
            _ => true,
        }
    }

    /// Write the RAM copy to the store if it changed since the last read or
    /// write.
    ///
    /// A failed write may have torn the slot, so it forgets what the store
    /// holds and the next `save` writes again. No retry happens here.
    ///
    /// # Errors
    ///
    /// `OutOfRange` before any I/O, `Encode` if the payload cannot be
    /// encoded, `StorageWrite` if the driver fails.
    pub fn save<S: ByteStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveOutcome, StoreError<S::Error>> {
        self.check_range(store.capacity())?;

        let mut buf = [0u8; N];
        let header = self.encode_current(&mut buf)?;

        if self.last_written == Some(header.checksum) {
            self.baseline = Some(header.checksum);
            self.stats.skipped = self.stats.skipped.saturating_add(1);
            trace!("{} unchanged, write skipped", self.region.slot());
            return Ok(SaveOutcome::Unchanged);
        }

        match store.write(self.region.base().value(), &buf[..Self::RECORD_LEN]) {
            Ok(()) => {
                self.last_written = Some(header.checksum);
                self.baseline = Some(header.checksum);
                self.stats.writes = self.stats.writes.saturating_add(1);
                debug!(
                    "Wrote {} bytes for {} at {}",
                    Self::RECORD_LEN,
                    self.region.slot(),
                    self.region.base()
                );
                Ok(SaveOutcome::Written)
            }
            Err(e) => {
                self.last_written = None;
                self.baseline = None;
                self.stats.failed = self.stats.failed.saturating_add(1);
                error!("Write of {} at {} failed", self.region.slot(), self.region.base());
                Err(StoreError::StorageWrite(e))
            }
        }
    }

    /// Reset the RAM copy to the defaults and persist them.
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub fn reinitialize<S: ByteStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveOutcome, StoreError<S::Error>> {
        info!("Reinitializing {} to defaults", self.region.slot());
        self.current = self.default.clone();
        self.state = ObjectState::Defaulted;
        self.save(store)
    }

    /// Re-read the stored record and validate it against this manager's
    /// schema without touching the RAM copy.
    ///
    /// The outer `Result` carries store failures; the inner one says whether
    /// the record would load.
    ///
    /// # Errors
    ///
    /// `OutOfRange` or `Read`.
    pub fn verify<S: ByteStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<Result<RecordHeader, DecodeError>, StoreError<S::Error>> {
        let mut buf = [0u8; N];
        let bytes = self.read_record(store, &mut buf)?;
        Ok(decode_record::<P>(bytes, self.version).map(|(_, header)| header))
    }

    /// Save any pending changes and consume the manager.
    ///
    /// This is the teardown flush. A manager that goes out of scope with
    /// unsaved changes only logs a warning (or panics with the
    /// `unsaved-drop-panic` feature).
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save). The changes are lost on error.
    pub fn close<S: ByteStore + ?Sized>(
        mut self,
        store: &mut S,
    ) -> Result<SaveOutcome, StoreError<S::Error>> {
        self.drop_check = false;
        self.save(store)
    }

    /// Write counters for this manager.
    #[inline]
    pub fn stats(&self) -> SaveStats {
        self.stats
    }

    /// The region this manager is bound to.
    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    /// The schema version records are written under.
    #[inline]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    fn encode_current(&self, buf: &mut [u8; N]) -> Result<RecordHeader, EncodeError> {
        encode_record(&self.current, self.version, buf)
    }

    fn current_checksum(&self) -> Option<u32> {
        let mut buf = [0u8; N];
        self.encode_current(&mut buf).ok().map(|header| header.checksum)
    }

    fn check_range<E>(&self, capacity: usize) -> Result<(), StoreError<E>> {
        let base = self.region.base().value() as usize;
        match base.checked_add(Self::RECORD_LEN) {
            Some(end) if end <= capacity => Ok(()),
            _ => Err(StoreError::OutOfRange {
                address: self.region.base(),
                len: Self::RECORD_LEN,
                capacity,
            }),
        }
    }

    fn read_record<'b, S: ByteStore + ?Sized>(
        &self,
        store: &mut S,
        buf: &'b mut [u8; N],
    ) -> Result<&'b [u8], StoreError<S::Error>> {
        self.check_range(store.capacity())?;
        let bytes = &mut buf[..Self::RECORD_LEN];
        trace!("Reading {} bytes at {}", Self::RECORD_LEN, self.region.base());
        store
            .read(self.region.base().value(), bytes)
            .map_err(StoreError::Read)?;
        Ok(bytes)
    }
}

impl<P: Payload + Clone, const N: usize> Drop for SettingsManager<P, N> {
    fn drop(&mut self) {
        if self.drop_check && self.has_unsaved_changes() {
            #[cfg(feature = "unsaved-drop-panic")]
            panic!("Settings {} dropped with unsaved changes", self.region.slot());
            #[cfg(not(feature = "unsaved-drop-panic"))]
            warn!("Settings {} dropped with unsaved changes", self.region.slot());
        }
    }
}

impl<P: Payload + Clone + core::fmt::Debug, const N: usize> core::fmt::Debug
    for SettingsManager<P, N>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("region", &self.region)
            .field("version", &self.version)
            .field("state", &self.state)
            .field("current", &self.current)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
