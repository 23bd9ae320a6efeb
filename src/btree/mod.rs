//! # B+Tree Page Implementation
//!
//! This module implements the page layer of LarchDB's B+tree: the fixed-size
//! node containers an external tree driver composes into a tree. The driver
//! owns cross-page concerns (descent, split propagation, rebalancing); the
//! page owns its binary layout and the node-local operations.
//!
//! ## Node Types
//!
//! - **Interior pages** hold [`KeyCell`]s: separator keys paired with child
//!   page identifiers, plus a `right_child` pointer for keys greater than
//!   or equal to the last separator.
//!
//! - **Leaf pages** hold [`KeyValueCell`]s: keys paired with opaque
//!   payloads, plus optional sibling links so range scans can walk the leaf
//!   level without revisiting parents.
//!
//! A page is homogeneous in cell type for its whole lifetime. The two
//! shapes are a [`Node`] sum type rather than a dynamically-typed cell
//! container, so the mismatch between a page and a cell is caught at the
//! page API boundary instead of deep inside a cast.
//!
//! ## Physical vs Logical Order
//!
//! Cells are stored in insertion order and never move; an offsets table
//! maps logical (sorted) position to physical cell index. Key search is a
//! binary search over the offsets table, so cell bytes stay put even as
//! the sorted view changes:
//!
//! ```text
//! cells   (physical): [key=123] [key=12] [key=1] [key=1234]
//! offsets (logical):  [2, 1, 0, 3]   -> 1, 12, 123, 1234
//! ```
//!
//! ## Page Layout
//!
//! Every page encodes to exactly 4096 bytes: a typed header, the offsets
//! table, the cell pool in physical order, and zero padding. See `page.rs`
//! for the byte-level layout and `cell.rs` for the cell encodings.
//!
//! ## Capacity
//!
//! Cell ceilings are derived from the layout, not configured:
//! [`MAX_INTERIOR_NODE_CELLS`] (291) and [`MAX_LEAF_NODE_CELLS`] (406).
//! Leaf fullness is additionally byte-budget aware, since key/value cells
//! are variable-sized.

mod cell;
mod page;

pub use cell::{
    CellType, KeyCell, KeyValueCell, KEY_CELL_SIZE, KEY_VALUE_CELL_HEADER_SIZE,
    MIN_KEY_VALUE_CELL_SIZE,
};
pub use page::{
    InteriorNode, LeafNode, Node, Page, SearchResult, INTERIOR_HEADER_SIZE, LEAF_HEADER_SIZE,
    MAX_INTERIOR_NODE_CELLS, MAX_LEAF_NODE_CELLS, OFFSET_ENTRY_SIZE,
};
