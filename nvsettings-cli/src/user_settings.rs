//! The user settings object kept on Particle-style devices.
//!
//! Field layout (71 bytes, little-endian):
//!
//! | Offset | Size | Field         |
//! |--------|------|---------------|
//! | 0      | 16   | user name     |
//! | 16     | 16   | password      |
//! | 32     | 1    | time zone     |
//! | 33     | 4    | DST offset    |
//! | 37     | 1    | DST enabled   |
//! | 38     | 32   | host name     |
//! | 70     | 1    | antenna       |

use std::fmt;

use clap::ValueEnum;
use nvsettings::domain::{
    EncodeError, FixedStr, Payload, PayloadReader, PayloadWriter, SchemaVersion, record_len,
};

/// Schema version of the current layout.
pub const USER_SETTINGS_VERSION: SchemaVersion = SchemaVersion::new(1);

/// Slot name the object is registered under.
pub const USER_SETTINGS_SLOT: &str = "user";

/// Record buffer size for a manager of [`UserSettings`].
pub const USER_SETTINGS_RECORD: usize = record_len(UserSettings::SIZE);

/// Valid time zones, in hours from UTC.
pub const TIME_ZONE_RANGE: std::ops::RangeInclusive<i8> = -12..=14;

/// WiFi antenna selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Antenna {
    /// On-board chip antenna.
    #[default]
    Internal,
    /// u.FL connector.
    External,
    /// Pick whichever has the better signal.
    Auto,
}

impl Antenna {
    /// Device firmware's numeric code for this selection.
    pub const fn code(self) -> u8 {
        match self {
            Antenna::Internal => 0,
            Antenna::External => 1,
            Antenna::Auto => 3,
        }
    }

    /// Parse a device firmware code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Antenna::Internal),
            1 => Some(Antenna::External),
            3 => Some(Antenna::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for Antenna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antenna::Internal => write!(f, "Internal"),
            Antenna::External => write!(f, "External"),
            Antenna::Auto => write!(f, "Auto"),
        }
    }
}

impl Payload for Antenna {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        self.code().encode(out)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        Self::from_code(u8::decode(bytes)?)
    }
}

/// User name, password, clock and WiFi settings.
///
/// String setters truncate to the field size and return `false` when they
/// had to; the time zone setter rejects values outside
/// [`TIME_ZONE_RANGE`].
#[derive(Debug, Clone, PartialEq)]
pub struct UserSettings {
    user_name: FixedStr<16>,
    password: FixedStr<16>,
    time_zone: i8,
    dst_offset: f32,
    dst_enabled: bool,
    host_name: FixedStr<32>,
    antenna: Antenna,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_name: FixedStr::new("DefaultUser"),
            password: FixedStr::new("DefaultPW"),
            time_zone: -6,
            dst_offset: 1.0,
            dst_enabled: true,
            host_name: FixedStr::new("DefaultHostName"),
            antenna: Antenna::Internal,
        }
    }
}

impl UserSettings {
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn time_zone(&self) -> i8 {
        self.time_zone
    }

    pub fn dst_offset(&self) -> f32 {
        self.dst_offset
    }

    pub fn is_dst_enabled(&self) -> bool {
        self.dst_enabled
    }

    pub fn host_name(&self) -> &str {
        self.host_name.as_str()
    }

    pub fn antenna(&self) -> Antenna {
        self.antenna
    }

    /// Set the user name (15 bytes max). Returns `false` if truncated.
    pub fn set_user_name(&mut self, name: &str) -> bool {
        self.user_name.set(name)
    }

    /// Set the password (15 bytes max). Returns `false` if truncated.
    pub fn set_password(&mut self, password: &str) -> bool {
        self.password.set(password)
    }

    /// Set the host name (31 bytes max). Returns `false` if truncated.
    pub fn set_host_name(&mut self, name: &str) -> bool {
        self.host_name.set(name)
    }

    /// Set the time zone. Returns `false` and keeps the old value if `tz` is
    /// out of range.
    pub fn set_time_zone(&mut self, tz: i8) -> bool {
        if TIME_ZONE_RANGE.contains(&tz) {
            self.time_zone = tz;
            true
        } else {
            false
        }
    }

    pub fn set_dst_offset(&mut self, offset: f32) {
        self.dst_offset = offset;
    }

    pub fn set_dst_enabled(&mut self, enabled: bool) {
        self.dst_enabled = enabled;
    }

    pub fn set_antenna(&mut self, antenna: Antenna) {
        self.antenna = antenna;
    }
}

impl Payload for UserSettings {
    const SIZE: usize = 71;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        let mut w = PayloadWriter::new(out);
        w.put(&self.user_name)?;
        w.put(&self.password)?;
        w.put(&self.time_zone)?;
        w.put(&self.dst_offset)?;
        w.put(&self.dst_enabled)?;
        w.put(&self.host_name)?;
        w.put(&self.antenna)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let mut r = PayloadReader::new(bytes);
        Some(Self {
            user_name: r.get()?,
            password: r.get()?,
            time_zone: r.get()?,
            dst_offset: r.get()?,
            dst_enabled: r.get()?,
            host_name: r.get()?,
            antenna: r.get()?,
        })
    }
}

impl fmt::Display for UserSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User Name: {}", self.user_name)?;
        writeln!(f, "Password: {}", self.password)?;
        writeln!(f, "Timezone: {}", self.time_zone)?;
        writeln!(f, "DST Offset: {:4.1}", self.dst_offset)?;
        writeln!(
            f,
            "DST Enabled: {}",
            if self.dst_enabled { "Yes" } else { "No" }
        )?;
        writeln!(f, "Hostname: {}", self.host_name)?;
        write!(f, "Antenna Type: {}", self.antenna)
    }
}
