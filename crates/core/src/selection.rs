//! Virtual selection with per-row overrides.
//!
//! The selection is "the first `virtual_count` records in global order",
//! adjusted by an override map holding only the rows the user flipped away
//! from that baseline. Only one page is ever needed to answer questions
//! about that page, and the total is computed from the map alone:
//!
//! ```text
//! total = max(0, virtual_count + #overrides(true) - #overrides(false))
//! ```
//!
//! This stays exact because an override is only ever stored when it
//! disagrees with the baseline, so each `true` entry is a row outside the
//! first N and each `false` entry is a row inside it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::error::InvalidCountError;
use crate::page::PageWindow;
use crate::record::{Record, RecordId};

/// A validated "select the first N rows" request. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualCount(NonZeroU64);

impl VirtualCount {
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for VirtualCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for VirtualCount {
    type Error = InvalidCountError;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(n)
            .map(VirtualCount)
            .ok_or_else(|| InvalidCountError::new(n.to_string()))
    }
}

impl TryFrom<i64> for VirtualCount {
    type Error = InvalidCountError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .ok()
            .and_then(NonZeroU64::new)
            .map(VirtualCount)
            .ok_or_else(|| InvalidCountError::new(n.to_string()))
    }
}

impl TryFrom<f64> for VirtualCount {
    type Error = InvalidCountError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        // 2^64 as f64; anything at or above it does not fit.
        const LIMIT: f64 = 18_446_744_073_709_551_616.0;
        if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n >= LIMIT {
            return Err(InvalidCountError::new(n.to_string()));
        }
        VirtualCount::try_from(n as u64)
    }
}

impl FromStr for VirtualCount {
    type Err = InvalidCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(NonZeroU64::new)
            .map(VirtualCount)
            .ok_or_else(|| InvalidCountError::new(s))
    }
}

impl TryFrom<&str> for VirtualCount {
    type Error = InvalidCountError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One rendered row: the record, its global rank, and its effective state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowView<'a, R> {
    pub record: &'a R,
    pub rank: u64,
    pub selected: bool,
    /// True when an override decides the state rather than the virtual count.
    pub overridden: bool,
}

/// Virtual count plus override map. Owned by exactly one reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    virtual_count: u64,
    overrides: HashMap<RecordId, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn virtual_count(&self) -> u64 {
        self.virtual_count
    }

    pub fn overrides(&self) -> &HashMap<RecordId, bool> {
        &self.overrides
    }

    pub fn override_for(&self, id: RecordId) -> Option<bool> {
        self.overrides.get(&id).copied()
    }

    /// Replace the intent. Clears every override: a fresh count supersedes
    /// earlier manual edits. This is the only place overrides are cleared.
    pub fn set_virtual_count(&mut self, count: VirtualCount) {
        log::debug!(
            "virtual count {} -> {}, dropping {} override(s)",
            self.virtual_count,
            count,
            self.overrides.len()
        );
        self.virtual_count = count.get();
        self.overrides.clear();
    }

    /// State the virtual count alone gives the row at `rank`.
    pub fn implied(&self, rank: u64) -> bool {
        rank <= self.virtual_count
    }

    pub fn is_selected(&self, id: RecordId, rank: u64) -> bool {
        match self.overrides.get(&id) {
            Some(&forced) => forced,
            None => self.implied(rank),
        }
    }

    /// Selected records of `window`, in page order.
    pub fn selected<'w, R: Record>(&self, window: &'w PageWindow<R>) -> Vec<&'w R> {
        window
            .ranked()
            .filter(|(rank, record)| self.is_selected(record.id(), *rank))
            .map(|(_, record)| record)
            .collect()
    }

    /// Every row of `window` with its rank and effective state.
    pub fn rows<'w, R: Record>(&self, window: &'w PageWindow<R>) -> Vec<RowView<'w, R>> {
        window
            .ranked()
            .map(|(rank, record)| {
                let id = record.id();
                RowView {
                    record,
                    rank,
                    selected: self.is_selected(id, rank),
                    overridden: self.overrides.contains_key(&id),
                }
            })
            .collect()
    }

    /// Fold the full checked set reported for `window` into the override
    /// map. Rows that match their implied state lose any override; rows that
    /// differ get one. Ids in `checked` that are not on the page are ignored
    /// and rows on other pages are left alone. Returns how many entries
    /// changed.
    pub fn reconcile<R: Record>(&mut self, window: &PageWindow<R>, checked: &HashSet<RecordId>) -> usize {
        let mut changed = 0;
        for (rank, record) in window.ranked() {
            let id = record.id();
            let implied = self.implied(rank);
            let is_checked = checked.contains(&id);
            if is_checked == implied {
                if self.overrides.remove(&id).is_some() {
                    changed += 1;
                }
            } else if self.overrides.insert(id, is_checked) != Some(is_checked) {
                changed += 1;
            }
        }
        if changed > 0 {
            log::debug!(
                "page {}: {} override(s) changed, {} held",
                window.page(),
                changed,
                self.overrides.len()
            );
        }
        changed
    }

    /// Flip one row on `window`. Returns the row's new state, or `None` if
    /// the id is not on the page.
    pub fn toggle<R: Record>(&mut self, window: &PageWindow<R>, id: RecordId) -> Option<bool> {
        window.position(id)?;
        let mut checked = self.checked_ids(window);
        let now = if checked.remove(&id) {
            false
        } else {
            checked.insert(id);
            true
        };
        self.reconcile(window, &checked);
        Some(now)
    }

    /// Check or clear every row of `window` (the header checkbox).
    pub fn set_page<R: Record>(&mut self, window: &PageWindow<R>, checked: bool) {
        let ids = if checked {
            window.records().iter().map(Record::id).collect()
        } else {
            HashSet::new()
        };
        self.reconcile(window, &ids);
    }

    fn checked_ids<R: Record>(&self, window: &PageWindow<R>) -> HashSet<RecordId> {
        self.selected(window).into_iter().map(Record::id).collect()
    }

    /// Total selected rows across the whole record set.
    pub fn total_selected(&self) -> u64 {
        let (added, removed) = self
            .overrides
            .values()
            .fold((0u64, 0u64), |(a, r), &forced| if forced { (a + 1, r) } else { (a, r + 1) });
        (self.virtual_count + added).saturating_sub(removed)
    }
}
