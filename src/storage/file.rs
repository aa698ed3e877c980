//! File-backed slot store
//!
//! One checksummed file per slot under a data directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};

use crate::config::Config;
use crate::error::{CatalogError, Result};
use super::{validate_slot_name, SlotStore};

/// Magic bytes at the start of every slot file
pub const MAGIC: &[u8; 4] = b"BKSL";

/// Slot file format version
pub const VERSION: u16 = 1;

/// Magic (4) + version (2) + payload length (4) + CRC32 (4)
pub const HEADER_SIZE: usize = 14;

/// Stores each slot as `{dir}/{slot}.slot`
///
/// Writes go to a temporary sibling that is renamed over the slot file, so a
/// failed write leaves the previous contents readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding slot files
    dir: PathBuf,

    /// fsync the temporary file before renaming it into place
    sync_writes: bool,
}

impl FileStore {
    const EXTENSION: &'static str = "slot";
    const TMP_EXTENSION: &'static str = "slot.tmp";

    /// Open or create a store rooted at `dir`
    pub fn open(dir: &Path, sync_writes: bool) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            CatalogError::Storage(format!("cannot create data directory {}: {}", dir.display(), e))
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            sync_writes,
        })
    }

    /// Open the store described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.data_dir, config.sync_writes)
    }

    /// Directory holding slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slot, Self::EXTENSION))
    }

    fn tmp_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slot, Self::TMP_EXTENSION))
    }
}

impl SlotStore for FileStore {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        validate_slot_name(slot)?;
        let path = self.slot_path(slot);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CatalogError::Storage(format!(
                    "cannot read slot {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let payload = decode_frame(&bytes).map_err(|e| match e {
            CatalogError::Corrupt(msg) => {
                CatalogError::Corrupt(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::trace!("Loaded slot {} ({} bytes)", slot, payload.len());
        Ok(Some(payload))
    }

    fn save(&self, slot: &str, data: &str) -> Result<()> {
        validate_slot_name(slot)?;
        let tmp_path = self.tmp_path(slot);
        let path = self.slot_path(slot);
        let frame = encode_frame(data);

        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&frame)?;
            if self.sync_writes {
                file.sync_all()?;
            }
            fs::rename(&tmp_path, &path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(CatalogError::Storage(format!(
                "cannot write slot {}: {}",
                path.display(),
                e
            )));
        }

        tracing::trace!("Saved slot {} ({} bytes)", slot, data.len());
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        validate_slot_name(from)?;
        validate_slot_name(to)?;
        let from_path = self.slot_path(from);
        let to_path = self.slot_path(to);

        match fs::rename(&from_path, &to_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::Storage(format!(
                "cannot move slot {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))),
        }
    }

    fn remove(&self, slot: &str) -> Result<()> {
        validate_slot_name(slot)?;
        let path = self.slot_path(slot);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::Storage(format!(
                "cannot remove slot {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Wrap a payload in the slot file frame
pub fn encode_frame(payload: &str) -> Vec<u8> {
    let payload = payload.as_bytes();
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());

    buf.put_slice(MAGIC);
    buf.put_u16_le(VERSION);
    buf.put_u32_le(payload.len() as u32);
    buf.put_u32_le(crc32fast::hash(payload));
    buf.put_slice(payload);

    buf.to_vec()
}

/// Verify a slot file frame and return its payload
pub fn decode_frame(bytes: &[u8]) -> Result<String> {
    if bytes.len() < HEADER_SIZE {
        return Err(CatalogError::Corrupt(format!(
            "truncated header ({} of {} bytes)",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let mut buf = bytes;

    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if &magic != MAGIC {
        return Err(CatalogError::Corrupt("bad magic".to_string()));
    }

    let version = buf.get_u16_le();
    if version != VERSION {
        return Err(CatalogError::Corrupt(format!("unsupported version {}", version)));
    }

    let len = buf.get_u32_le() as usize;
    let expected_crc = buf.get_u32_le();

    if buf.remaining() != len {
        return Err(CatalogError::Corrupt(format!(
            "payload length mismatch (header says {}, found {})",
            len,
            buf.remaining()
        )));
    }

    let actual_crc = crc32fast::hash(buf);
    if actual_crc != expected_crc {
        return Err(CatalogError::Corrupt(format!(
            "checksum mismatch (expected {:08x}, got {:08x})",
            expected_crc, actual_crc
        )));
    }

    String::from_utf8(buf.to_vec())
        .map_err(|e| CatalogError::Corrupt(format!("payload is not UTF-8: {}", e)))
}
