//! ROM loading and validation.
//!
//! ROM sets come from an extracted directory, a ZIP archive (via the
//! frontend), or programmatic byte slices (for testing). Each file may carry
//! a CRC32 that is validated unless checksums are skipped for modified or
//! development ROMs.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CRC-32 (private)
// ---------------------------------------------------------------------------

/// CRC-32 lookup table (reflected polynomial 0xEDB88320).
/// Same algorithm as MAME, ZIP, PNG, and Ethernet.
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

/// Compute the CRC-32 checksum of a byte slice.
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    crc ^ 0xFFFF_FFFF
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a ROM set.
#[derive(Debug, Error)]
pub enum RomLoadError {
    /// Underlying I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required ROM file was not found in the set.
    #[error("missing ROM file: {0}")]
    MissingFile(String),

    /// ROM file size does not match the expected size.
    #[error("ROM {file}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    /// CRC32 checksum does not match the expected value.
    #[error("ROM {file}: CRC32 expected 0x{expected:08X}, got 0x{actual:08X}")]
    ChecksumMismatch {
        file: String,
        expected: u32,
        actual: u32,
    },
}

// ---------------------------------------------------------------------------
// RomSet
// ---------------------------------------------------------------------------

/// A collection of ROM files loaded from disk or provided programmatically.
#[derive(Debug)]
pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    /// Create a RomSet from a directory of extracted ROM files.
    ///
    /// Reads all files in the directory (non-recursive) and stores
    /// them by filename (without path).
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.is_file() {
                let name = file_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                let data = std::fs::read(&file_path)?;
                files.insert(name, data);
            }
        }
        Ok(Self { files })
    }

    /// Create a RomSet from programmatic byte slices (for testing).
    ///
    /// Each entry is a (filename, data) pair.
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let mut files = HashMap::new();
        for (name, data) in entries {
            files.insert(name.to_string(), data.to_vec());
        }
        Self { files }
    }

    /// Create a RomSet from owned (filename, data) pairs, e.g. the members
    /// of an archive.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            files: entries.into_iter().collect(),
        }
    }

    /// Get a ROM file's data by name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|v| v.as_slice())
    }

    /// Get a ROM file's data, returning an error if missing.
    pub fn require(&self, name: &str) -> Result<&[u8], RomLoadError> {
        self.get(name)
            .ok_or_else(|| RomLoadError::MissingFile(name.to_string()))
    }

    /// Get a ROM file's data, validating its size.
    pub fn require_sized(&self, name: &str, expected_size: usize) -> Result<&[u8], RomLoadError> {
        let data = self.require(name)?;
        if data.len() != expected_size {
            return Err(RomLoadError::SizeMismatch {
                file: name.to_string(),
                expected: expected_size,
                actual: data.len(),
            });
        }
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// RomEntry / RomRegion
// ---------------------------------------------------------------------------

/// Describes how a single ROM file maps into a memory region.
pub struct RomEntry {
    /// Filename in the ROM set.
    pub name: &'static str,
    /// Expected size in bytes.
    pub size: usize,
    /// Offset within the target memory region where this ROM is loaded.
    pub offset: usize,
    /// Optional CRC32 checksum. `None` means no checksum is defined
    /// and the file is always accepted. `Some(value)` will be validated
    /// during [`RomRegion::load_with`] unless checksums are skipped.
    pub crc32: Option<u32>,
}

/// Whether to validate CRC32 checksums while assembling a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Checksums {
    #[default]
    Verify,
    Skip,
}

/// Describes the complete ROM mapping for a machine or subsystem.
///
/// A region has a total size and a list of ROM entries that fill parts of it.
/// Call [`load_with`](Self::load_with) to assemble the region from a
/// [`RomSet`] under a [`Checksums`] policy.
pub struct RomRegion {
    /// Total size of the memory region in bytes.
    pub size: usize,
    /// Byte value for the parts of the region no ROM covers.
    pub fill: u8,
    /// Individual ROM file entries.
    pub entries: &'static [RomEntry],
}

impl RomRegion {
    /// Load with an explicit checksum policy. Sizes are always validated;
    /// `Checksums::Skip` accepts modified or hacked images.
    pub fn load_with(&self, rom_set: &RomSet, checksums: Checksums) -> Result<Vec<u8>, RomLoadError> {
        let mut region = vec![self.fill; self.size];

        for entry in self.entries {
            debug_assert!(
                entry.offset + entry.size <= self.size,
                "RomEntry '{}' exceeds region bounds: offset {} + size {} > region size {}",
                entry.name,
                entry.offset,
                entry.size,
                self.size,
            );

            let data = rom_set.require_sized(entry.name, entry.size)?;

            if checksums == Checksums::Verify && let Some(expected_crc) = entry.crc32 {
                let actual_crc = crc32(data);
                if actual_crc != expected_crc {
                    return Err(RomLoadError::ChecksumMismatch {
                        file: entry.name.to_string(),
                        expected: expected_crc,
                        actual: actual_crc,
                    });
                }
            }

            region[entry.offset..entry.offset + entry.size].copy_from_slice(data);
        }

        Ok(region)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
