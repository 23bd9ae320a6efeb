//! # Storage Module
//!
//! This module provides the page store layer for LarchDB: an addressed
//! collection of fixed-size pages with monotonic identifier assignment and a
//! persistent root pointer.
//!
//! ## Store Contract
//!
//! Two interchangeable backends implement the [`PageStore`] trait:
//!
//! - [`MemoryStore`]: a transient `Vec`-backed store for tests and
//!   ephemeral trees
//! - [`FileStore`]: a memory-mapped file of page slots with a trailer
//!   holding store metadata
//!
//! Both assign identifiers densely from 0 in append order, and both return
//! an owned page from `fetch`. A page fetched from a store is a snapshot;
//! mutations become visible to other readers only through `update`.
//!
//! ## Identifier Semantics
//!
//! A [`PageId`] is an opaque `u64` handle. In the file store it is derived
//! from the slot offset (`offset / PAGE_SIZE`); in the memory store it is
//! the vector index. Identifiers are never reused by the stores themselves;
//! free-page tracking is the tree driver's concern.
//!
//! ## File Format
//!
//! The file store's backing file is a sequence of 4096-byte page slots
//! followed by a 40-byte trailer:
//!
//! ```text
//! Offset 0:              Page slot 0 (4096 bytes)
//! Offset 4096:           Page slot 1 (4096 bytes)
//! ...
//! Offset next_free:      Trailer (40 bytes)
//! ```
//!
//! The trailer records the next free write offset and the root page
//! identifier; it is all the bookkeeping needed to recover a store after a
//! restart. See `trailer.rs` for the exact layout.
//!
//! ## Durability
//!
//! Writes go through a shared memory map and are not fsynced on every
//! operation. `FileStore::save` flushes the map; until then the operating
//! system decides when dirty pages reach disk.
//!
//! ## Thread Safety
//!
//! Stores contain no internal synchronization. Callers that share a store
//! across threads wrap it in a lock; the blanket [`PageStore`] impl for
//! `parking_lot::RwLockWriteGuard` lets a held write guard be used directly
//! as a store.

mod file;
mod memory;
mod trailer;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use trailer::{StoreTrailer, NO_ROOT_PAGE, STORE_MAGIC, STORE_TRAILER_SIZE, STORE_VERSION};

use eyre::Result;

use crate::btree::Page;

pub const PAGE_SIZE: usize = 4096;

/// Opaque page handle assigned by a store. Dense and monotonically
/// increasing from 0 within a store.
pub type PageId = u64;

pub trait PageStore {
    /// Stores a copy of the page, assigns the next identifier, and writes
    /// it back into `page` before returning it.
    fn append(&mut self, page: &mut Page) -> Result<PageId>;

    /// Returns an owned copy of the page most recently stored under `id`.
    fn fetch(&self, id: PageId) -> Result<Page>;

    /// Overwrites the page stored under `id` in place. The page's own
    /// identifier must match the slot being written.
    fn update(&mut self, id: PageId, page: &Page) -> Result<()>;

    /// Records the page's identifier as the store root. The page must
    /// already have been appended.
    fn set_root(&mut self, page: &Page) -> Result<()>;

    /// Fetches the page previously marked as root.
    fn get_root(&self) -> Result<Page>;

    fn page_count(&self) -> u64;
}

impl<S: PageStore> PageStore for parking_lot::RwLockWriteGuard<'_, S> {
    fn append(&mut self, page: &mut Page) -> Result<PageId> {
        (**self).append(page)
    }

    fn fetch(&self, id: PageId) -> Result<Page> {
        (**self).fetch(id)
    }

    fn update(&mut self, id: PageId, page: &Page) -> Result<()> {
        (**self).update(id, page)
    }

    fn set_root(&mut self, page: &Page) -> Result<()> {
        (**self).set_root(page)
    }

    fn get_root(&self) -> Result<Page> {
        (**self).get_root()
    }

    fn page_count(&self) -> u64 {
        (**self).page_count()
    }
}
