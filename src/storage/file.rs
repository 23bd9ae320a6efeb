//! # File-Backed Page Store
//!
//! Persistent [`PageStore`] backend over a memory-mapped file. The file is
//! a run of 4096-byte page slots followed by the 40-byte [`StoreTrailer`];
//! a page's identifier is its slot offset divided by the page size, so
//! identifiers are dense from 0 and never recycled by the store.
//!
//! ## Growth
//!
//! Appending a page extends the file by one slot: flush the map, extend
//! the file, remap. `append` requires `&mut self`, so the borrow checker
//! guarantees no page slices survive across a remap.
//!
//! ## Durability
//!
//! Mutations land in the shared map and reach disk whenever the operating
//! system writes them back. `save` flushes the map synchronously; a store
//! reopened after `save` reproduces the saved state exactly. The trailer
//! bytes at the end of the map are kept current on every metadata change,
//! so a clean process exit usually persists them even without `save` —
//! only `save` guarantees it.
//!
//! ## No Caching
//!
//! `fetch` decodes a fresh page from the map every time. A buffer pool, if
//! wanted, belongs to the layer above and should key on page identifiers.

use std::fs::{File, OpenOptions};
use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use memmap2::MmapMut;
use zerocopy::IntoBytes;

use crate::btree::Page;
use crate::storage::trailer::{StoreTrailer, STORE_TRAILER_SIZE};
use crate::storage::{PageId, PageStore, PAGE_SIZE};

#[derive(Debug)]
pub struct FileStore {
    file: File,
    mmap: MmapMut,
    trailer: StoreTrailer,
}

impl FileStore {
    /// Creates a new, empty store file containing only a fresh trailer.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .wrap_err_with(|| format!("failed to create store file '{}'", path.display()))?;

        file.set_len(STORE_TRAILER_SIZE as u64)
            .wrap_err_with(|| format!("failed to size store file '{}'", path.display()))?;

        // SAFETY: MmapMut::map_mut is unsafe because memory-mapped files can
        // be modified externally, leading to undefined behavior. This is safe
        // because:
        // 1. We just created this file with exclusive access (truncate=true)
        // 2. Store files are not meant to be modified by external processes
        // 3. The mmap lifetime is tied to FileStore, preventing use-after-unmap
        let mmap = unsafe {
            MmapMut::map_mut(&file)
                .wrap_err_with(|| format!("failed to memory-map '{}'", path.display()))?
        };

        let mut store = Self {
            file,
            mmap,
            trailer: StoreTrailer::new(),
        };
        store.save()?;

        Ok(store)
    }

    /// Opens an existing store file and restores its state from the
    /// trailer. Fails if the file is absent or the trailer is malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .wrap_err_with(|| format!("failed to open store file '{}'", path.display()))?;

        let file_size = file
            .metadata()
            .wrap_err_with(|| format!("failed to get metadata for '{}'", path.display()))?
            .len();

        ensure!(
            file_size >= STORE_TRAILER_SIZE as u64,
            "store file '{}' is too small to hold a trailer ({} bytes)",
            path.display(),
            file_size
        );
        ensure!(
            (file_size - STORE_TRAILER_SIZE as u64) % PAGE_SIZE as u64 == 0,
            "store file '{}' size {} is not a trailer plus whole page slots",
            path.display(),
            file_size
        );

        // SAFETY: MmapMut::map_mut is unsafe because memory-mapped files can
        // be modified externally. This is safe because:
        // 1. The file is opened with read+write access for this process
        // 2. Store files are not meant to be modified by external processes
        // 3. The mmap lifetime is tied to FileStore, preventing use-after-unmap
        let mmap = unsafe {
            MmapMut::map_mut(&file)
                .wrap_err_with(|| format!("failed to memory-map '{}'", path.display()))?
        };

        let trailer_offset = file_size as usize - STORE_TRAILER_SIZE;
        let trailer = StoreTrailer::from_bytes(&mmap[trailer_offset..])?;

        ensure!(
            trailer.next_free_offset() == file_size - STORE_TRAILER_SIZE as u64,
            "trailer next_free_offset {} does not match file size {}",
            trailer.next_free_offset(),
            file_size
        );

        Ok(Self {
            file,
            mmap,
            trailer,
        })
    }

    /// Writes the trailer and flushes the map so a subsequent `open`
    /// reproduces the current state. Safe to call repeatedly.
    pub fn save(&mut self) -> Result<()> {
        self.write_trailer();
        self.mmap.flush().wrap_err("failed to sync store file")
    }

    pub fn next_free_offset(&self) -> u64 {
        self.trailer.next_free_offset()
    }

    fn write_trailer(&mut self) {
        let offset = self.trailer.next_free_offset() as usize;
        self.mmap[offset..offset + STORE_TRAILER_SIZE].copy_from_slice(self.trailer.as_bytes());
    }

    fn grow_one_slot(&mut self) -> Result<()> {
        self.mmap
            .flush_async()
            .wrap_err("failed to flush store file before grow")?;

        let new_size =
            self.trailer.next_free_offset() + PAGE_SIZE as u64 + STORE_TRAILER_SIZE as u64;
        self.file
            .set_len(new_size)
            .wrap_err_with(|| format!("failed to extend store file to {} bytes", new_size))?;

        // SAFETY: MmapMut::map_mut is unsafe because the old mmap becomes
        // invalid. This is safe because:
        // 1. grow_one_slot requires &mut self, so no page slices can exist
        //    (borrow checker)
        // 2. The old map was flushed above, so no dirty bytes are lost
        // 3. The file was extended to new_size before remapping
        // 4. The old mmap is dropped when the new one is assigned
        self.mmap = unsafe {
            MmapMut::map_mut(&self.file).wrap_err("failed to remap store file after grow")?
        };

        Ok(())
    }
}

impl PageStore for FileStore {
    fn append(&mut self, page: &mut Page) -> Result<PageId> {
        let offset = self.trailer.next_free_offset();
        let id = offset / PAGE_SIZE as u64;
        page.set_page_id(id);

        // encode before growing, so a failed encode leaves the file untouched
        let buf = page.encode()?;

        self.grow_one_slot()?;
        self.mmap[offset as usize..offset as usize + PAGE_SIZE].copy_from_slice(&buf);

        self.trailer.set_next_free_offset(offset + PAGE_SIZE as u64);
        self.write_trailer();

        Ok(id)
    }

    fn fetch(&self, id: PageId) -> Result<Page> {
        ensure!(
            id < self.page_count(),
            "page {} out of bounds (page_count={})",
            id,
            self.page_count()
        );

        let offset = id as usize * PAGE_SIZE;
        Page::decode(&self.mmap[offset..offset + PAGE_SIZE])
    }

    fn update(&mut self, id: PageId, page: &Page) -> Result<()> {
        ensure!(
            id < self.page_count(),
            "page {} out of bounds (page_count={})",
            id,
            self.page_count()
        );
        ensure!(
            page.page_id() == id,
            "page identifier mismatch: updating slot {} with page {}",
            id,
            page.page_id()
        );

        let buf = page.encode()?;
        let offset = id as usize * PAGE_SIZE;
        self.mmap[offset..offset + PAGE_SIZE].copy_from_slice(&buf);
        Ok(())
    }

    fn set_root(&mut self, page: &Page) -> Result<()> {
        ensure!(
            page.page_id() < self.page_count(),
            "page {} has not been appended to this store",
            page.page_id()
        );

        self.trailer.set_root_page_id(page.page_id());
        self.write_trailer();
        Ok(())
    }

    fn get_root(&self) -> Result<Page> {
        ensure!(self.trailer.has_root(), "no root page set");
        self.fetch(self.trailer.root_page_id())
    }

    fn page_count(&self) -> u64 {
        self.trailer.next_free_offset() / PAGE_SIZE as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::{CellType, Node};
    use tempfile::tempdir;

    #[test]
    fn create_append_fetch_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::create(dir.path().join("pages.db")).unwrap();

        let mut page = Page::new_leaf();
        page.append_cell(1, b"lorem ipsum").unwrap();
        page.append_cell(2, b"dolor sit amet").unwrap();

        let id = store.append(&mut page).unwrap();

        assert_eq!(id, 0);
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.fetch(id).unwrap(), page);
    }

    #[test]
    fn append_assigns_offset_derived_identifiers() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::create(dir.path().join("pages.db")).unwrap();

        for expected in 0..3u64 {
            let mut page = Page::new_leaf();
            assert_eq!(store.append(&mut page).unwrap(), expected);
        }

        assert_eq!(store.next_free_offset(), 3 * PAGE_SIZE as u64);
    }

    #[test]
    fn reopen_restores_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.db");

        let mut page = Page::new_leaf();
        page.append_cell(7, b"persisted").unwrap();

        {
            let mut store = FileStore::create(&path).unwrap();
            store.append(&mut page).unwrap();
            store.save().unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.next_free_offset(), PAGE_SIZE as u64);
        assert_eq!(store.fetch(0).unwrap(), page);
    }

    #[test]
    fn root_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.db");

        {
            let mut store = FileStore::create(&path).unwrap();
            let mut root = Page::new_leaf();
            store.append(&mut root).unwrap();
            store.set_root(&root).unwrap();
            store.save().unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let root = store.get_root().unwrap();
        assert_eq!(root.cell_type(), CellType::KeyValueCell);
        assert!(matches!(root.node(), Node::Leaf(_)));
    }

    #[test]
    fn update_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.db");

        let mut page = Page::new_leaf();

        {
            let mut store = FileStore::create(&path).unwrap();
            let id = store.append(&mut page).unwrap();

            page.append_cell(3, b"updated").unwrap();
            store.update(id, &page).unwrap();
            store.save().unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.fetch(0).unwrap(), page);
    }

    #[test]
    fn save_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::create(dir.path().join("pages.db")).unwrap();

        store.append(&mut Page::new_leaf()).unwrap();
        store.save().unwrap();
        store.save().unwrap();

        assert_eq!(store.next_free_offset(), PAGE_SIZE as u64);
    }

    #[test]
    fn fetch_out_of_bounds() {
        let dir = tempdir().unwrap();
        let store = FileStore::create(dir.path().join("pages.db")).unwrap();

        let err = store.fetch(0).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempdir().unwrap();

        let err = FileStore::open(dir.path().join("absent.db")).unwrap_err();
        assert!(err.to_string().contains("failed to open store file"));
    }

    #[test]
    fn open_rejects_misaligned_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.db");
        std::fs::write(&path, vec![0u8; STORE_TRAILER_SIZE + 100]).unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("whole page slots"));
    }

    #[test]
    fn open_rejects_bad_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.db");
        std::fs::write(&path, vec![0u8; STORE_TRAILER_SIZE]).unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("invalid magic bytes"));
    }

    #[test]
    fn open_rejects_inconsistent_trailer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.db");

        let mut trailer = StoreTrailer::new();
        trailer.set_next_free_offset(PAGE_SIZE as u64);
        std::fs::write(&path, trailer.as_bytes()).unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err
            .to_string()
            .contains("does not match file size"));
    }
}
