//! Command definitions and dispatch.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use nvsettings::domain::{
    AllocatorConfig, ByteStore, RecordHeader, RegionAllocator, SettingsManager, inspect_record,
};

use crate::address_parser::{address_arg, size_arg};
use crate::image::{DEFAULT_CAPACITY, ImageFile};
use crate::user_settings::{
    Antenna, USER_SETTINGS_RECORD, USER_SETTINGS_SLOT, USER_SETTINGS_VERSION, UserSettings,
};

type UserSettingsManager = SettingsManager<UserSettings, USER_SETTINGS_RECORD>;

/// Create, inspect and edit EEPROM settings images.
#[derive(Parser, Debug)]
#[command(name = "nvsettings", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// An image and where the settings record starts in it.
#[derive(Args, Debug)]
pub struct Target {
    /// EEPROM image file
    pub image: PathBuf,

    /// Address of the settings record (decimal or 0x hex)
    #[arg(short, long, value_parser = address_arg, default_value = "0")]
    pub address: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a blank (erased) image
    Create {
        /// Image file to create
        image: PathBuf,

        /// Image size in bytes (accepts 0x.. and a k suffix)
        #[arg(short, long, value_parser = size_arg, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the header of the record at an address and whether it is valid
    Inspect(Target),

    /// Load the user settings and print them
    Show(Target),

    /// Change user settings and save them
    Set {
        #[command(flatten)]
        target: Target,

        /// User name (15 characters max)
        #[arg(long)]
        user_name: Option<String>,

        /// Password (15 characters max)
        #[arg(long)]
        password: Option<String>,

        /// WiFi host name (31 characters max)
        #[arg(long)]
        host_name: Option<String>,

        /// Time zone in hours from UTC (-12 to 14)
        #[arg(long, allow_negative_numbers = true)]
        time_zone: Option<i8>,

        /// Daylight saving time offset in hours
        #[arg(long, allow_negative_numbers = true)]
        dst_offset: Option<f32>,

        /// Enable or disable daylight saving time
        #[arg(long)]
        dst_enabled: Option<bool>,

        /// WiFi antenna selection
        #[arg(long, value_enum)]
        antenna: Option<Antenna>,
    },

    /// Reset the user settings to defaults and save them
    Reset(Target),

    /// Overwrite one byte of the image, to try out corruption handling
    Corrupt {
        /// EEPROM image file
        image: PathBuf,

        /// Byte to overwrite
        #[arg(short, long, value_parser = address_arg)]
        offset: u32,

        /// New value (default: the old value with all bits flipped)
        #[arg(short, long)]
        value: Option<u8>,
    },

    /// Check the stored user settings record without loading it
    Verify(Target),
}

/// Run a parsed command, writing its report to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Create {
            image,
            capacity,
            force,
        } => {
            ImageFile::create(&image, capacity, force)?;
            writeln!(out, "Created {} ({} bytes)", image.display(), capacity)?;
        }
        Command::Inspect(target) => inspect(&target, out)?,
        Command::Show(target) => {
            let mut store = ImageFile::open(&target.image)?;
            let mut settings = bind(&store, target.address)?;
            let outcome = settings.load(&mut store)?;
            writeln!(out, "Load: {}", outcome)?;
            writeln!(out, "{}", settings.get())?;
        }
        Command::Set {
            target,
            user_name,
            password,
            host_name,
            time_zone,
            dst_offset,
            dst_enabled,
            antenna,
        } => {
            let mut store = ImageFile::open(&target.image)?;
            let mut settings = bind(&store, target.address)?;
            let outcome = settings.load(&mut store)?;
            log::info!("Loaded user settings: {}", outcome);

            settings.update(|s| -> Result<()> {
                if let Some(name) = &user_name {
                    if !s.set_user_name(name) {
                        log::warn!("User name truncated to '{}'", s.user_name());
                    }
                }
                if let Some(pw) = &password {
                    if !s.set_password(pw) {
                        log::warn!("Password truncated to 15 characters");
                    }
                }
                if let Some(name) = &host_name {
                    if !s.set_host_name(name) {
                        log::warn!("Host name truncated to '{}'", s.host_name());
                    }
                }
                if let Some(tz) = time_zone {
                    if !s.set_time_zone(tz) {
                        bail!("Time zone {} is outside -12..=14", tz);
                    }
                }
                if let Some(offset) = dst_offset {
                    s.set_dst_offset(offset);
                }
                if let Some(enabled) = dst_enabled {
                    s.set_dst_enabled(enabled);
                }
                if let Some(antenna) = antenna {
                    s.set_antenna(antenna);
                }
                Ok(())
            })?;

            let saved = settings.close(&mut store)?;
            writeln!(out, "Save: {:?}", saved)?;
        }
        Command::Reset(target) => {
            let mut store = ImageFile::open(&target.image)?;
            let mut settings = bind(&store, target.address)?;
            settings.reinitialize(&mut store)?;
            writeln!(out, "Reset to defaults")?;
            writeln!(out, "{}", settings.get())?;
        }
        Command::Corrupt {
            image,
            offset,
            value,
        } => {
            let mut store = ImageFile::open(&image)?;
            let mut byte = [0u8];
            store
                .read(offset, &mut byte)
                .with_context(|| format!("Failed to read offset {:#06x}", offset))?;
            let new = value.unwrap_or(!byte[0]);
            store
                .write(offset, &[new])
                .with_context(|| format!("Failed to write offset {:#06x}", offset))?;
            writeln!(out, "{:#06x}: {:#04x} -> {:#04x}", offset, byte[0], new)?;
        }
        Command::Verify(target) => {
            let mut store = ImageFile::open(&target.image)?;
            let settings = bind(&store, target.address)?;
            match settings.verify(&mut store)? {
                Ok(header) => writeln!(
                    out,
                    "OK: schema {}, checksum {:#010x}",
                    header.schema_version, header.checksum
                )?,
                Err(e) => bail!("Record at {:#06x} is not valid: {}", target.address, e),
            }
        }
    }
    Ok(())
}

/// Lay out the image the way the device firmware does: user settings first,
/// starting at `address`.
fn bind(store: &ImageFile, address: u32) -> Result<UserSettingsManager> {
    let mut allocator = RegionAllocator::<1>::for_store(store, AllocatorConfig::new(address));
    let manager = UserSettingsManager::register(
        &mut allocator,
        USER_SETTINGS_SLOT,
        USER_SETTINGS_VERSION,
        UserSettings::default(),
    )?;
    Ok(manager)
}

fn inspect(target: &Target, out: &mut impl Write) -> Result<()> {
    let mut store = ImageFile::open(&target.image)?;
    let available = store.capacity().saturating_sub(target.address as usize);
    if available < RecordHeader::SIZE {
        bail!(
            "Address {:#06x} leaves no room for a record header",
            target.address
        );
    }

    let mut head = [0u8; RecordHeader::SIZE];
    store.read(target.address, &mut head)?;
    let header = match RecordHeader::from_bytes(&head) {
        Ok(header) => header,
        Err(e) => {
            writeln!(out, "{:#06x}: {}", target.address, e)?;
            return Ok(());
        }
    };

    writeln!(out, "Address:  {:#06x}", target.address)?;
    writeln!(out, "Schema:   {}", header.schema_version)?;
    writeln!(out, "Payload:  {} bytes", header.payload_len)?;
    writeln!(out, "Checksum: {:#010x}", header.checksum)?;

    let mut record = vec![0u8; header.record_len().min(available)];
    store.read(target.address, &mut record)?;
    match inspect_record(&record) {
        Ok(_) => writeln!(out, "Status:   valid")?,
        Err(e) => writeln!(out, "Status:   {}", e)?,
    }
    Ok(())
}
