//! # LarchDB - B+Tree Page Storage Engine
//!
//! LarchDB is the on-disk page layer of a B+tree database: fixed-size
//! binary pages holding either routing entries (interior nodes) or
//! key/value payloads (leaf nodes), plus interchangeable page stores that
//! address those pages by identifier. This crate owns:
//!
//! - **Binary layout**: the 4096-byte page format and the store file
//!   format, little-endian throughout, with exact round-trip fidelity
//! - **Tree invariants**: sorted order via an offsets permutation, derived
//!   capacity ceilings, balanced splits with separator promotion, and leaf
//!   sibling linkage
//! - **Durability contract**: the file store's trailer is the only
//!   bookkeeping needed to recover a store after a restart
//!
//! Everything above the page — descent, split propagation, rebalancing,
//! transactions, any query surface — is an external tree driver built on
//! this crate's primitives.
//!
//! ## Quick Start
//!
//! ```ignore
//! use larchdb::{FileStore, Page, PageStore, SearchResult};
//!
//! let mut store = FileStore::create("./tree.db")?;
//!
//! let mut leaf = Page::new_leaf();
//! leaf.append_cell(42, b"the answer")?;
//!
//! store.append(&mut leaf)?;
//! store.set_root(&leaf)?;
//! store.save()?;
//!
//! let root = store.get_root()?;
//! if let SearchResult::Found(pos) = root.find_cell_offset(42) {
//!     println!("{:?}", root.value_at(pos)?);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tree Driver (external)            │
//! ├─────────────────────────────────────┤
//! │   Page (search/append/split)        │
//! ├───────────────┬─────────────────────┤
//! │   KeyCell     │   KeyValueCell      │
//! ├───────────────┴─────────────────────┤
//! │   PageStore (MemoryStore/FileStore) │
//! ├─────────────────────────────────────┤
//! │   Memory-Mapped File + Trailer      │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Store File Layout
//!
//! ```text
//! Offset 0:        Page slot 0 (4096 bytes)
//! Offset 4096:     Page slot 1 (4096 bytes)
//! ...
//! End - 40:        Trailer: magic, version, next free offset, root id
//! ```
//!
//! ## Concurrency Model
//!
//! The core is single-threaded and synchronous: no internal locks, no
//! background work, no retries. Callers serialize store access; a
//! `parking_lot` write guard can stand in for a store directly.
//!
//! ## Module Overview
//!
//! - [`btree`]: cells, the page container, and node-local operations
//! - [`storage`]: the store contract and its two backends

pub mod btree;
pub mod storage;

pub use btree::{CellType, KeyCell, KeyValueCell, Node, Page, SearchResult};
pub use storage::{FileStore, MemoryStore, PageId, PageStore, PAGE_SIZE};
