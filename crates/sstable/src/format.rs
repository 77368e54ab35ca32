//! SSTable binary format: header, footer, and the constants that describe
//! their fixed layouts.
//!
//! ```text
//! [HEADER  fixed, 50 bytes]
//!   magic "SPDB" (4) | version u16 (2) | feature_flags u32 (4) | reserved 16B (16)
//!   timestamp u64 (8) | entry_count u32 (4) | data_size u64 (8) | header_crc u32 (4)
//! [DATA    sorted records]
//! [INDEX   sparse (key, offset) pairs]
//! [FOOTER  fixed, 16 bytes]
//!   data_crc u32 (4) | index_offset u64 (8) | footer_crc u32 (4)
//! ```
//!
//! All integers are big-endian. Header and footer CRCs each cover only the
//! fields preceding them in their own structure.
//!
//! The listed header fields sum to 50 bytes, not the 46 quoted in an
//! earlier draft of the format description; this module's constant is
//! derived from the field layout, which is the byte-for-byte authoritative
//! contract (see `DESIGN.md`).

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use entry::{Result, StorageError};

pub const MAGIC: &[u8; 4] = b"SPDB";
pub const FORMAT_VERSION: u16 = 1;

const RESERVED_LEN: usize = 16;

/// Bytes covered by `header_crc`: everything in the header except the CRC itself.
const HEADER_CRC_COVERAGE_LEN: usize = 4 + 2 + 4 + RESERVED_LEN + 8 + 4 + 8;
/// Total on-disk header size.
pub const HEADER_LEN: u64 = (HEADER_CRC_COVERAGE_LEN + 4) as u64;

/// Bytes covered by `footer_crc`: `data_crc` + `index_offset`.
const FOOTER_CRC_COVERAGE_LEN: usize = 4 + 8;
/// Total on-disk footer size.
pub const FOOTER_LEN: u64 = (FOOTER_CRC_COVERAGE_LEN + 4) as u64;

/// The fixed-size file header. Written twice per SSTable: once as a
/// zeroed placeholder when the writer opens, and once for real at
/// `finalize`, once `entry_count`/`data_size` are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub feature_flags: u32,
    pub timestamp: u64,
    pub entry_count: u32,
    pub data_size: u64,
}

impl Header {
    pub fn placeholder(feature_flags: u32, timestamp: u64) -> Self {
        Header {
            feature_flags,
            timestamp,
            entry_count: 0,
            data_size: 0,
        }
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let mut coverage = Vec::with_capacity(HEADER_CRC_COVERAGE_LEN);
        coverage.extend_from_slice(MAGIC);
        coverage.write_u16::<BigEndian>(FORMAT_VERSION)?;
        coverage.write_u32::<BigEndian>(self.feature_flags)?;
        coverage.extend_from_slice(&[0u8; RESERVED_LEN]);
        coverage.write_u64::<BigEndian>(self.timestamp)?;
        coverage.write_u32::<BigEndian>(self.entry_count)?;
        coverage.write_u64::<BigEndian>(self.data_size)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&coverage);
        let crc = hasher.finalize();

        w.write_all(&coverage)?;
        w.write_u32::<BigEndian>(crc)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut coverage = vec![0u8; HEADER_CRC_COVERAGE_LEN];
        r.read_exact(&mut coverage)?;
        let stored_crc = r.read_u32::<BigEndian>()?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&coverage);
        if hasher.finalize() != stored_crc {
            return Err(StorageError::integrity(
                "SSTable header CRC mismatch".to_string(),
            ));
        }

        let mut cur = &coverage[..];
        let mut magic = [0u8; 4];
        cur.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(StorageError::format(format!(
                "bad SSTable magic: {magic:?}"
            )));
        }
        let version = cur.read_u16::<BigEndian>()?;
        if version != FORMAT_VERSION {
            return Err(StorageError::format(format!(
                "unsupported SSTable format version {version}"
            )));
        }
        let feature_flags = cur.read_u32::<BigEndian>()?;
        let mut reserved = [0u8; RESERVED_LEN];
        cur.read_exact(&mut reserved)?;
        let timestamp = cur.read_u64::<BigEndian>()?;
        let entry_count = cur.read_u32::<BigEndian>()?;
        let data_size = cur.read_u64::<BigEndian>()?;

        Ok(Header {
            feature_flags,
            timestamp,
            entry_count,
            data_size,
        })
    }
}

/// The fixed-size file footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub data_crc: u32,
    pub index_offset: u64,
}

impl Footer {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let mut coverage = Vec::with_capacity(FOOTER_CRC_COVERAGE_LEN);
        coverage.write_u32::<BigEndian>(self.data_crc)?;
        coverage.write_u64::<BigEndian>(self.index_offset)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&coverage);
        let crc = hasher.finalize();

        w.write_all(&coverage)?;
        w.write_u32::<BigEndian>(crc)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut coverage = vec![0u8; FOOTER_CRC_COVERAGE_LEN];
        r.read_exact(&mut coverage)?;
        let stored_crc = r.read_u32::<BigEndian>()?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&coverage);
        if hasher.finalize() != stored_crc {
            return Err(StorageError::integrity(
                "SSTable footer CRC mismatch".to_string(),
            ));
        }

        let mut cur = &coverage[..];
        let data_crc = cur.read_u32::<BigEndian>()?;
        let index_offset = cur.read_u64::<BigEndian>()?;

        Ok(Footer {
            data_crc,
            index_offset,
        })
    }
}
