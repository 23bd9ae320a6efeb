//! # In-Memory Page Store
//!
//! A transient [`PageStore`] backend over a plain vector. Identifiers are
//! vector indices, so appends assign them densely from 0. Nothing survives
//! the process; the backend exists so a tree driver (and the test suite)
//! can run against store semantics without touching a file.
//!
//! `fetch` clones the stored page. Mutating the returned page does not
//! change the store; write the mutation back with `update`, exactly as with
//! the file backend.

use eyre::{ensure, eyre, Result};

use crate::btree::Page;
use crate::storage::{PageId, PageStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Vec<Page>,
    root: Option<PageId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStore for MemoryStore {
    fn append(&mut self, page: &mut Page) -> Result<PageId> {
        let id = self.pages.len() as PageId;
        page.set_page_id(id);
        self.pages.push(page.clone());
        Ok(id)
    }

    fn fetch(&self, id: PageId) -> Result<Page> {
        self.pages.get(id as usize).cloned().ok_or_else(|| {
            eyre!(
                "page {} out of bounds (page_count={})",
                id,
                self.pages.len()
            )
        })
    }

    fn update(&mut self, id: PageId, page: &Page) -> Result<()> {
        ensure!(
            (id as usize) < self.pages.len(),
            "page {} out of bounds (page_count={})",
            id,
            self.pages.len()
        );
        ensure!(
            page.page_id() == id,
            "page identifier mismatch: updating slot {} with page {}",
            id,
            page.page_id()
        );

        self.pages[id as usize] = page.clone();
        Ok(())
    }

    fn set_root(&mut self, page: &Page) -> Result<()> {
        ensure!(
            (page.page_id() as usize) < self.pages.len(),
            "page {} has not been appended to this store",
            page.page_id()
        );

        self.root = Some(page.page_id());
        Ok(())
    }

    fn get_root(&self) -> Result<Page> {
        let root = self.root.ok_or_else(|| eyre!("no root page set"))?;
        self.fetch(root)
    }

    fn page_count(&self) -> u64 {
        self.pages.len() as u64
    }
}
