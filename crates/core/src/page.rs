//! Page windows and global rank arithmetic.
//!
//! A window is the one page of records currently held in memory. Ranks are
//! 1-based positions in the full, server-ordered record set:
//! `(page - 1) * page_size + offset + 1`.

use crate::record::Record;

/// One page as returned by a loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub records: Vec<R>,
    /// Size of the whole record set, not of this page.
    pub total_count: u64,
}

/// The committed page. Replaced wholesale on every navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<R> {
    page: usize,
    page_size: usize,
    records: Vec<R>,
}

impl<R: Record> PageWindow<R> {
    pub fn new(page: usize, page_size: usize, records: Vec<R>) -> Self {
        Self { page, page_size, records }
    }

    /// 1-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Global rank of the record at in-page `offset`.
    pub fn rank_of(&self, offset: usize) -> u64 {
        global_rank(self.page, self.page_size, offset)
    }

    /// Records paired with their global rank, in page order.
    pub fn ranked(&self) -> impl Iterator<Item = (u64, &R)> {
        self.records
            .iter()
            .enumerate()
            .map(move |(offset, record)| (self.rank_of(offset), record))
    }

    /// Offset of the record with the given id, if it is on this page.
    pub fn position(&self, id: crate::RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

/// 1-based global rank of the record at `offset` on 1-based `page`.
/// Saturates at `u64::MAX`; [`first_rank`] tells whether a page is addressable.
pub fn global_rank(page: usize, page_size: usize, offset: usize) -> u64 {
    let before = (page.saturating_sub(1) as u64).saturating_mul(page_size as u64);
    before.saturating_add(offset as u64).saturating_add(1)
}

/// Rank of the first row on `page`, or `None` if it does not fit in `u64`.
pub fn first_rank(page: usize, page_size: usize) -> Option<u64> {
    (page.checked_sub(1)? as u64)
        .checked_mul(page_size as u64)?
        .checked_add(1)
}

/// Number of pages needed for `total_count` records. At least 1, so an
/// empty record set still has a page to show.
pub fn page_count(total_count: u64, page_size: usize) -> usize {
    if page_size == 0 || total_count == 0 {
        return 1;
    }
    total_count.div_ceil(page_size as u64) as usize
}

/// Inclusive `(from, to)` rank range shown on `page`. `(0, 0)` when there
/// is nothing to show: an empty record set, or a page past the end. An
/// empty set reads "0 to 0" rather than "1 to 0".
pub fn visible_range(page: usize, page_size: usize, total_count: u64) -> (u64, u64) {
    let from = global_rank(page, page_size, 0);
    if total_count == 0 || from > total_count {
        return (0, 0);
    }
    let to = (page as u64).saturating_mul(page_size as u64).min(total_count);
    (from, to)
}

/// `"Showing {from} to {to} of {total} entries"`.
pub fn footer_text(page: usize, page_size: usize, total_count: u64) -> String {
    let (from, to) = visible_range(page, page_size, total_count);
    format!("Showing {} to {} of {} entries", from, to, total_count)
}
