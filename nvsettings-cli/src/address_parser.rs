//! Number parsing for command-line addresses and sizes.
//!
//! Accepts decimal (`64`), hexadecimal (`0x40`) and binary (`0b1000000`)
//! notation, with `_` separators. Sizes also take a `k`/`K` suffix for
//! multiples of 1024.

use anyhow::{Context, Result, bail};

/// Parse an address or offset.
///
/// # Examples
///
/// ```
/// use nvsettings_cli::address_parser::parse_address;
///
/// assert_eq!(parse_address("0x40").unwrap(), 64);
/// assert_eq!(parse_address("1_024").unwrap(), 1024);
/// ```
pub fn parse_address(text: &str) -> Result<u32> {
    let cleaned: String = text.trim().chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() {
        bail!("Empty address");
    }

    let (digits, radix) = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        (bin, 2)
    } else {
        (cleaned.as_str(), 10)
    };

    u32::from_str_radix(digits, radix).with_context(|| format!("Invalid address: {}", text))
}

/// Parse an image size, optionally with a `k` suffix.
///
/// # Examples
///
/// ```
/// use nvsettings_cli::address_parser::parse_size;
///
/// assert_eq!(parse_size("4k").unwrap(), 4096);
/// assert_eq!(parse_size("2047").unwrap(), 2047);
/// ```
pub fn parse_size(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    let (number, multiplier) = match trimmed.strip_suffix(['k', 'K']) {
        Some(number) => (number, 1024),
        None => (trimmed, 1),
    };

    let value = parse_address(number).with_context(|| format!("Invalid size: {}", text))?;
    let size = (value as usize)
        .checked_mul(multiplier)
        .with_context(|| format!("Size too large: {}", text))?;
    if size == 0 {
        bail!("Size must be non-zero");
    }
    Ok(size)
}

/// Adapter for clap's `value_parser`.
pub fn address_arg(text: &str) -> std::result::Result<u32, String> {
    parse_address(text).map_err(|e| format!("{:#}", e))
}

/// Adapter for clap's `value_parser`.
pub fn size_arg(text: &str) -> std::result::Result<usize, String> {
    parse_size(text).map_err(|e| format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_address("0").unwrap(), 0);
        assert_eq!(parse_address(" 42 ").unwrap(), 42);
    }

    #[test]
    fn test_parse_hex_and_binary() {
        assert_eq!(parse_address("0x7FF").unwrap(), 2047);
        assert_eq!(parse_address("0XFF").unwrap(), 255);
        assert_eq!(parse_address("0b1010").unwrap(), 10);
        assert_eq!(parse_address("0x_10_00").unwrap(), 4096);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_address("").is_err());
        assert!(parse_address("0x").is_err());
        assert!(parse_address("-1").is_err());
        assert!(parse_address("ten").is_err());
        let err = parse_address("0xZZ").unwrap_err();
        assert!(err.to_string().contains("0xZZ"));
    }

    #[test]
    fn test_parse_size_suffix() {
        assert_eq!(parse_size("1k").unwrap(), 1024);
        assert_eq!(parse_size("0x10K").unwrap(), 16 * 1024);
        assert!(parse_size("0").is_err());
        assert!(parse_size("k").is_err());
    }
}
