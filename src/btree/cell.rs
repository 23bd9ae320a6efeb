//! # Cell Types and Encodings
//!
//! A cell is a single record within a page. Interior pages hold key cells
//! (a separator key and the child page reached by keys below it); leaf
//! pages hold key/value cells (a key and an opaque payload).
//!
//! ## Encodings (little-endian)
//!
//! ```text
//! KeyCell (12 bytes):
//! +-----------+---------------------+
//! | key (4B)  | child page id (8B)  |
//! +-----------+---------------------+
//!
//! KeyValueCell (8 + N bytes):
//! +-----------+----------------+-----------------+
//! | key (4B)  | value len (4B) | value (N bytes) |
//! +-----------+----------------+-----------------+
//! ```
//!
//! Key cells are fixed-size; key/value cells are variable, so their decoder
//! reports how many bytes it consumed and the page decoder walks the cell
//! pool sequentially.

use eyre::{bail, ensure, Result};

use crate::storage::PageId;

pub const KEY_CELL_SIZE: usize = 12;
pub const KEY_VALUE_CELL_HEADER_SIZE: usize = 8;

/// Smallest possible key/value cell: a key with an empty payload.
pub const MIN_KEY_VALUE_CELL_SIZE: usize = KEY_VALUE_CELL_HEADER_SIZE;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    KeyCell = 0x01,
    KeyValueCell = 0x02,
}

impl CellType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x01 => Ok(CellType::KeyCell),
            0x02 => Ok(CellType::KeyValueCell),
            _ => bail!("unknown cell type tag {:#04x}", b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCell {
    key: u32,
    child: PageId,
}

impl KeyCell {
    pub fn new(key: u32, child: PageId) -> Self {
        Self { key, child }
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    /// The child page holding keys strictly below this cell's key.
    pub fn child(&self) -> PageId {
        self.child
    }

    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        ensure!(
            buf.len() >= KEY_CELL_SIZE,
            "buffer too small for key cell: {} < {}",
            buf.len(),
            KEY_CELL_SIZE
        );

        buf[..4].copy_from_slice(&self.key.to_le_bytes());
        buf[4..KEY_CELL_SIZE].copy_from_slice(&self.child.to_le_bytes());
        Ok(())
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        ensure!(
            buf.len() >= KEY_CELL_SIZE,
            "buffer too small for key cell: {} < {}",
            buf.len(),
            KEY_CELL_SIZE
        );

        let mut key = [0u8; 4];
        key.copy_from_slice(&buf[..4]);
        let mut child = [0u8; 8];
        child.copy_from_slice(&buf[4..KEY_CELL_SIZE]);

        Ok(Self {
            key: u32::from_le_bytes(key),
            child: PageId::from_le_bytes(child),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueCell {
    key: u32,
    value: Vec<u8>,
}

impl KeyValueCell {
    pub fn new(key: u32, value: &[u8]) -> Self {
        Self {
            key,
            value: value.to_vec(),
        }
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn encoded_size(&self) -> usize {
        KEY_VALUE_CELL_HEADER_SIZE + self.value.len()
    }

    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        let size = self.encoded_size();
        ensure!(
            buf.len() >= size,
            "buffer too small for key/value cell: {} < {}",
            buf.len(),
            size
        );

        buf[..4].copy_from_slice(&self.key.to_le_bytes());
        buf[4..8].copy_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf[8..size].copy_from_slice(&self.value);
        Ok(())
    }

    /// Decodes a cell from the front of `buf`, returning the cell and the
    /// number of bytes consumed.
    pub fn from_bytes(buf: &[u8]) -> Result<(Self, usize)> {
        ensure!(
            buf.len() >= KEY_VALUE_CELL_HEADER_SIZE,
            "buffer too small for key/value cell header: {} < {}",
            buf.len(),
            KEY_VALUE_CELL_HEADER_SIZE
        );

        let mut key = [0u8; 4];
        key.copy_from_slice(&buf[..4]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&buf[4..8]);

        let value_len = u32::from_le_bytes(len) as usize;
        let size = KEY_VALUE_CELL_HEADER_SIZE + value_len;
        ensure!(
            buf.len() >= size,
            "key/value cell payload extends beyond buffer: need {}, have {}",
            size,
            buf.len()
        );

        Ok((
            Self {
                key: u32::from_le_bytes(key),
                value: buf[KEY_VALUE_CELL_HEADER_SIZE..size].to_vec(),
            },
            size,
        ))
    }
}
