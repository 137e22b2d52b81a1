//! Page loader abstraction.

use std::sync::Arc;

use crate::error::FetchError;
use crate::page::Page;

/// Fetches one page of a server-ordered record set. Blocking; callers that
/// must stay responsive run it through [`crate::fetch::dispatch`].
pub trait PageLoader<R>: Send + Sync {
    /// `page` is 1-based.
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page<R>, FetchError>;
}

impl<R, L: PageLoader<R> + ?Sized> PageLoader<R> for Arc<L> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page<R>, FetchError> {
        (**self).fetch_page(page, page_size)
    }
}

impl<R, L: PageLoader<R> + ?Sized> PageLoader<R> for Box<L> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page<R>, FetchError> {
        (**self).fetch_page(page, page_size)
    }
}

/// In-memory loader over a fixed record set.
pub struct VecLoader<R> {
    records: Arc<Vec<R>>,
}

impl<R: Clone + Send + Sync> VecLoader<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records: Arc::new(records) }
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }
}

impl<R: Clone + Send + Sync> PageLoader<R> for VecLoader<R> {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page<R>, FetchError> {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let records = self
            .records
            .iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        Ok(Page {
            records,
            total_count: self.records.len() as u64,
        })
    }
}
