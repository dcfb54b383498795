//! CRC32 checksums for stored table files
//!
//! - Every table file written gets a checksum in the manifest
//! - Every read verifies it before parsing
//!
//! Uses CRC32 (IEEE polynomial) via the crc32fast crate.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a checksum as `crc32:xxxxxxxx` (lowercase hex, zero-padded).
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a `crc32:xxxxxxxx` string back to u32.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let hex = formatted.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
