//! Wire format for a single WAL record.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use entry::{MAX_KEY_BYTES, MAX_VALUE_BYTES};

/// Prefix written into the key field of a FLUSH record, ahead of the
/// SSTable id it names.
pub const FLUSH_KEY_PREFIX: &str = "FLUSH:";

const KIND_PUT: u8 = 1;
const KIND_DELETE: u8 = 2;
const KIND_FLUSH: u8 = 3;

/// Header size, in bytes, excluding the leading CRC32.
const HEADER_SANS_CRC_LEN: usize = 8 + 8 + 1 + 4 + 4;

/// A single framed WAL record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalRecord {
    Put {
        sequence: u64,
        timestamp: u64,
        key: String,
        value: Vec<u8>,
    },
    Delete {
        sequence: u64,
        timestamp: u64,
        key: String,
    },
    Flush {
        sequence: u64,
        timestamp: u64,
        sstable_id: String,
    },
}

impl WalRecord {
    pub fn sequence(&self) -> u64 {
        match self {
            WalRecord::Put { sequence, .. }
            | WalRecord::Delete { sequence, .. }
            | WalRecord::Flush { sequence, .. } => *sequence,
        }
    }

    pub fn is_flush(&self) -> bool {
        matches!(self, WalRecord::Flush { .. })
    }

    /// Validates this record's key/value sizes before it is written,
    /// returning distinct errors for an oversized key vs. an oversized
    /// value.
    pub fn validate(&self) -> entry::Result<()> {
        match self {
            WalRecord::Put { key, value, .. } => {
                entry::validate_key(key)?;
                entry::validate_value(value)?;
            }
            WalRecord::Delete { key, .. } => {
                entry::validate_key(key)?;
            }
            WalRecord::Flush { .. } => {}
        }
        Ok(())
    }

    /// Serializes this record to its on-disk framing, CRC included.
    pub fn encode(&self) -> Vec<u8> {
        let (kind, key_bytes, value_bytes, sequence, timestamp): (u8, Vec<u8>, &[u8], u64, u64) =
            match self {
                WalRecord::Put {
                    sequence,
                    timestamp,
                    key,
                    value,
                } => (KIND_PUT, key.as_bytes().to_vec(), value.as_slice(), *sequence, *timestamp),
                WalRecord::Delete {
                    sequence,
                    timestamp,
                    key,
                } => (KIND_DELETE, key.as_bytes().to_vec(), &[], *sequence, *timestamp),
                WalRecord::Flush {
                    sequence,
                    timestamp,
                    sstable_id,
                } => (
                    KIND_FLUSH,
                    format!("{FLUSH_KEY_PREFIX}{sstable_id}").into_bytes(),
                    &[],
                    *sequence,
                    *timestamp,
                ),
            };

        let mut header = Vec::with_capacity(HEADER_SANS_CRC_LEN);
        header.write_u64::<BigEndian>(sequence).unwrap();
        header.write_u64::<BigEndian>(timestamp).unwrap();
        header.write_u8(kind).unwrap();
        header.write_u32::<BigEndian>(key_bytes.len() as u32).unwrap();
        header.write_u32::<BigEndian>(value_bytes.len() as u32).unwrap();

        let mut crc_input = Vec::with_capacity(header.len() + key_bytes.len() + value_bytes.len());
        crc_input.extend_from_slice(&header);
        crc_input.extend_from_slice(&key_bytes);
        crc_input.extend_from_slice(value_bytes);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&crc_input);
        let crc = hasher.finalize();

        let mut out = Vec::with_capacity(4 + crc_input.len());
        out.write_u32::<BigEndian>(crc).unwrap();
        out.extend_from_slice(&crc_input);
        out
    }

    /// Attempts to decode one record starting at the beginning of `buf`.
    ///
    /// Returns the record and the number of bytes it consumed. Returns
    /// `None` for any failure — insufficient bytes, a length field beyond
    /// the configured maxima, a CRC mismatch, or invalid UTF-8 in the key.
    /// The caller is expected to treat `None` as "not a valid record at
    /// this offset" and resynchronize, per the resilient-replay contract.
    pub fn try_decode(buf: &[u8]) -> Option<(WalRecord, usize)> {
        if buf.len() < 4 + HEADER_SANS_CRC_LEN {
            return None;
        }
        let mut rdr = &buf[..];
        let crc = rdr.read_u32::<BigEndian>().ok()?;
        let sequence = rdr.read_u64::<BigEndian>().ok()?;
        let timestamp = rdr.read_u64::<BigEndian>().ok()?;
        let kind = rdr.read_u8().ok()?;
        let key_len = rdr.read_u32::<BigEndian>().ok()? as usize;
        let value_len = rdr.read_u32::<BigEndian>().ok()? as usize;

        if key_len > MAX_KEY_BYTES || value_len > MAX_VALUE_BYTES {
            return None;
        }

        let total_len = 4 + HEADER_SANS_CRC_LEN + key_len + value_len;
        if buf.len() < total_len {
            return None;
        }

        let key_start = 4 + HEADER_SANS_CRC_LEN;
        let value_start = key_start + key_len;
        let key_bytes = &buf[key_start..value_start];
        let value_bytes = &buf[value_start..value_start + value_len];

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&buf[4..key_start]);
        hasher.update(key_bytes);
        hasher.update(value_bytes);
        if hasher.finalize() != crc {
            return None;
        }

        let key = String::from_utf8(key_bytes.to_vec()).ok()?;

        let record = match kind {
            KIND_PUT => WalRecord::Put {
                sequence,
                timestamp,
                key,
                value: value_bytes.to_vec(),
            },
            KIND_DELETE => WalRecord::Delete {
                sequence,
                timestamp,
                key,
            },
            KIND_FLUSH => {
                let sstable_id = key.strip_prefix(FLUSH_KEY_PREFIX)?.to_string();
                WalRecord::Flush {
                    sequence,
                    timestamp,
                    sstable_id,
                }
            }
            _ => return None,
        };

        Some((record, total_len))
    }
}
