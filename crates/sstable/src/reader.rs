//! SSTable reader: parses the header and footer, loads the sparse index
//! into memory, and answers point lookups with a binary search over the
//! index followed by a bounded linear scan of the data region.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt};
use entry::{Entry, Result, MAX_KEY_BYTES, MAX_VALUE_BYTES};

use crate::format::{Footer, Header, FOOTER_LEN, HEADER_LEN};

/// A read-only handle on one SSTable file.
///
/// Opening parses the header (verifying magic and header CRC), reads the
/// footer, and loads the sparse index into memory. The reader does not
/// keep a live file handle between calls to [`get`](SSTableReader::get):
/// each call opens the file fresh, matching the coordinator's
/// open-reader / call-get / close read path.
pub struct SSTableReader {
    path: PathBuf,
    header: Header,
    sparse_index: Vec<(String, u64)>,
}

impl SSTableReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| entry::StorageError::io(path, e))?;
        let mut r = BufReader::new(file);

        let header = Header::read(&mut r)?;

        let file_len = r
            .get_ref()
            .metadata()
            .map_err(|e| entry::StorageError::io(path, e))?
            .len();
        let footer_start = file_len.saturating_sub(FOOTER_LEN);
        r.seek(SeekFrom::Start(footer_start))
            .map_err(|e| entry::StorageError::io(path, e))?;
        let footer = Footer::read(&mut r)?;

        let mut sparse_index = Vec::new();
        if footer.index_offset > 0 {
            r.seek(SeekFrom::Start(footer.index_offset))
                .map_err(|e| entry::StorageError::io(path, e))?;
            let index_bytes_len = footer_start.saturating_sub(footer.index_offset) as usize;
            let mut index_buf = vec![0u8; index_bytes_len];
            r.read_exact(&mut index_buf)
                .map_err(|e| entry::StorageError::io(path, e))?;

            let mut cur = &index_buf[..];
            let count = cur.read_u32::<BigEndian>()?;
            for _ in 0..count {
                let key_len = cur.read_u32::<BigEndian>()? as usize;
                if key_len > MAX_KEY_BYTES {
                    return Err(entry::StorageError::format(
                        "SSTable sparse index entry exceeds maximum key length".to_string(),
                    ));
                }
                let mut key_bytes = vec![0u8; key_len];
                cur.read_exact(&mut key_bytes)?;
                let key = String::from_utf8(key_bytes).map_err(|_| {
                    entry::StorageError::format("SSTable sparse index key is not valid UTF-8".to_string())
                })?;
                let offset = cur.read_u64::<BigEndian>()?;
                sparse_index.push((key, offset));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            header,
            sparse_index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// Number of entries sampled into the in-memory sparse index.
    pub fn index_len(&self) -> usize {
        self.sparse_index.len()
    }

    /// Looks up `key`. Returns `Ok(None)` both when the key is genuinely
    /// absent and when the scan runs into any bounds or UTF-8 failure —
    /// either way, "not found" per the point-lookup contract.
    pub fn get(&self, key: &str) -> Result<Option<Entry>> {
        let start_offset = self.search_start_offset(key);

        let file = File::open(&self.path).map_err(|e| entry::StorageError::io(&self.path, e))?;
        let mut r = BufReader::new(file);
        r.seek(SeekFrom::Start(start_offset))
            .map_err(|e| entry::StorageError::io(&self.path, e))?;

        let data_end = HEADER_LEN + self.header.data_size;
        let mut pos = start_offset;

        while pos < data_end {
            let sequence = match r.read_u64::<BigEndian>() {
                Ok(v) => v,
                Err(_) => return Ok(None),
            };
            let key_len = match r.read_u32::<BigEndian>() {
                Ok(v) => v as usize,
                Err(_) => return Ok(None),
            };
            if key_len > MAX_KEY_BYTES {
                return Ok(None);
            }
            let mut key_buf = vec![0u8; key_len];
            if r.read_exact(&mut key_buf).is_err() {
                return Ok(None);
            }
            let value_len = match r.read_u32::<BigEndian>() {
                Ok(v) => v as usize,
                Err(_) => return Ok(None),
            };
            if value_len > MAX_VALUE_BYTES {
                return Ok(None);
            }
            let mut value_buf = vec![0u8; value_len];
            if r.read_exact(&mut value_buf).is_err() {
                return Ok(None);
            }

            let record_len = 8 + 4 + key_len as u64 + 4 + value_len as u64;
            pos += record_len;

            let current_key = match String::from_utf8(key_buf) {
                Ok(k) => k,
                Err(_) => return Ok(None),
            };

            if current_key == key {
                let entry = if value_len == 0 {
                    Entry::new_delete(current_key, sequence, None)
                } else {
                    Entry::new_put(current_key, sequence, value_buf, None)
                };
                return Ok(entry.ok());
            }
            if current_key.as_str() > key {
                return Ok(None);
            }
        }

        Ok(None)
    }

    /// Binary-searches the sparse index for the largest sampled key that
    /// is `<= key`, returning its offset. Falls back to the start of the
    /// data region when there is no index or no sampled key qualifies.
    fn search_start_offset(&self, key: &str) -> u64 {
        match self
            .sparse_index
            .binary_search_by(|(indexed_key, _)| indexed_key.as_str().cmp(key))
        {
            Ok(exact) => self.sparse_index[exact].1,
            Err(0) => HEADER_LEN,
            Err(insert_at) => self.sparse_index[insert_at - 1].1,
        }
    }
}
