//! # Store Trailer
//!
//! The file store keeps its metadata in a 40-byte trailer after the last
//! page slot. The trailer is the only bookkeeping the store needs to
//! recover its state on open.
//!
//! ## Layout (40 bytes, little-endian)
//!
//! ```text
//! Offset  Size  Field             Description
//! ------  ----  ----------------  ------------------------------------
//! 0       16    magic             "LarchDB Store v1"
//! 16      4     version           Format version, currently 1
//! 20      4     reserved          Zero
//! 24      8     next_free_offset  Next write position; multiple of the
//!                                 page size and equal to file length
//!                                 minus the trailer at rest
//! 32      8     root_page_id      Root pointer, u64::MAX when unset
//! ```
//!
//! The root sentinel is `u64::MAX` rather than 0 because 0 is a valid page
//! identifier.

use eyre::{ensure, Result};
use zerocopy::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const STORE_TRAILER_SIZE: usize = 40;
pub const STORE_MAGIC: &[u8; 16] = b"LarchDB Store v1";
pub const STORE_VERSION: u32 = 1;
pub const NO_ROOT_PAGE: u64 = u64::MAX;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct StoreTrailer {
    magic: [u8; 16],
    version: U32,
    reserved: U32,
    next_free_offset: U64,
    root_page_id: U64,
}

const _: () = assert!(std::mem::size_of::<StoreTrailer>() == STORE_TRAILER_SIZE);

impl StoreTrailer {
    pub fn new() -> Self {
        Self {
            magic: *STORE_MAGIC,
            version: U32::new(STORE_VERSION),
            reserved: U32::new(0),
            next_free_offset: U64::new(0),
            root_page_id: U64::new(NO_ROOT_PAGE),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= STORE_TRAILER_SIZE,
            "buffer too small for StoreTrailer: {} < {}",
            bytes.len(),
            STORE_TRAILER_SIZE
        );

        let trailer = Self::read_from_bytes(&bytes[..STORE_TRAILER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse StoreTrailer: {:?}", e))?;

        ensure!(
            &trailer.magic == STORE_MAGIC,
            "invalid magic bytes in store trailer"
        );
        ensure!(
            trailer.version.get() == STORE_VERSION,
            "unsupported store version: {} (expected {})",
            trailer.version.get(),
            STORE_VERSION
        );

        Ok(trailer)
    }

    pub fn version(&self) -> u32 {
        self.version.get()
    }

    pub fn next_free_offset(&self) -> u64 {
        self.next_free_offset.get()
    }

    pub fn set_next_free_offset(&mut self, offset: u64) {
        self.next_free_offset = U64::new(offset);
    }

    pub fn root_page_id(&self) -> u64 {
        self.root_page_id.get()
    }

    pub fn set_root_page_id(&mut self, id: u64) {
        self.root_page_id = U64::new(id);
    }

    pub fn has_root(&self) -> bool {
        self.root_page_id.get() != NO_ROOT_PAGE
    }
}

impl Default for StoreTrailer {
    fn default() -> Self {
        Self::new()
    }
}
