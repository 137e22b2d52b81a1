//! The selection reconciler: one value per UI session tying navigation,
//! virtual selection and the count prompt together.
//!
//! Display surfaces feed it three events (`on_page_change`,
//! `on_selection_change`, `on_custom_count_submit`) and read back a
//! [`DisplayState`] on every redraw. All mutation goes through `&mut self`,
//! so no reader ever sees a half-applied edit.

use std::collections::HashSet;

use crate::error::{FetchError, InvalidCountError, NavigationError, SelectionError};
use crate::navigator::{LoadOutcome, LoadState, PageNavigator, PageRequest, PageResponse};
use crate::page::{self, PageWindow};
use crate::record::{Record, RecordId};
use crate::selection::{RowView, Selection, VirtualCount};

/// The transient "select N rows" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountPrompt {
    pub open: bool,
    pub draft: String,
}

/// Everything a display surface needs to draw one frame.
#[derive(Debug, Clone)]
pub struct DisplayState<'a, R> {
    pub rows: Vec<RowView<'a, R>>,
    pub loading: bool,
    pub error: Option<&'a FetchError>,
    /// Page the paginator shows (the requested one, even while loading).
    pub page: usize,
    pub page_count: usize,
    pub total_count: u64,
    pub total_selected: u64,
    pub footer: String,
}

impl<R> DisplayState<'_, R> {
    pub fn banner(&self) -> String {
        format!("Selected {} rows", self.total_selected)
    }

    pub fn selected_summary(&self) -> String {
        format!("{} row(s) selected", self.total_selected)
    }
}

#[derive(Debug)]
pub struct SelectionReconciler<R> {
    navigator: PageNavigator<R>,
    selection: Selection,
    prompt: CountPrompt,
}

impl<R: Record> SelectionReconciler<R> {
    pub fn new(page_size: usize) -> Self {
        Self {
            navigator: PageNavigator::new(page_size),
            selection: Selection::new(),
            prompt: CountPrompt::default(),
        }
    }

    pub fn navigator(&self) -> &PageNavigator<R> {
        &self.navigator
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn prompt(&self) -> &CountPrompt {
        &self.prompt
    }

    pub fn window(&self) -> Option<&PageWindow<R>> {
        self.navigator.window()
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn on_page_change(&mut self, page: usize) -> Result<PageRequest, NavigationError> {
        self.navigator.go_to_page(page)
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        self.navigator.next_page()
    }

    pub fn prev_page(&mut self) -> Option<PageRequest> {
        self.navigator.prev_page()
    }

    pub fn first_page(&mut self) -> PageRequest {
        self.navigator.first_page()
    }

    pub fn last_page(&mut self) -> PageRequest {
        self.navigator.last_page()
    }

    pub fn retry(&mut self) -> Option<PageRequest> {
        self.navigator.retry()
    }

    pub fn on_page_loaded(&mut self, response: PageResponse<R>) -> LoadOutcome {
        self.navigator.complete(response)
    }

    // ── Selection edits ─────────────────────────────────────────────

    /// The widget reported the full checked set for the current page.
    pub fn on_selection_change(&mut self, checked: &HashSet<RecordId>) -> Result<(), SelectionError> {
        let window = editable(&self.navigator)?;
        self.selection.reconcile(window, checked);
        Ok(())
    }

    /// Flip one row. `Ok(None)` if the id is not on the current page.
    pub fn toggle(&mut self, id: RecordId) -> Result<Option<bool>, SelectionError> {
        let window = editable(&self.navigator)?;
        Ok(self.selection.toggle(window, id))
    }

    /// Flip the row at `offset` on the current page.
    pub fn toggle_at(&mut self, offset: usize) -> Result<Option<bool>, SelectionError> {
        let window = editable(&self.navigator)?;
        let Some(id) = window.records().get(offset).map(Record::id) else {
            return Ok(None);
        };
        Ok(self.selection.toggle(window, id))
    }

    pub fn check_page(&mut self) -> Result<(), SelectionError> {
        let window = editable(&self.navigator)?;
        self.selection.set_page(window, true);
        Ok(())
    }

    pub fn uncheck_page(&mut self) -> Result<(), SelectionError> {
        let window = editable(&self.navigator)?;
        self.selection.set_page(window, false);
        Ok(())
    }

    // ── Virtual count ───────────────────────────────────────────────

    /// Select the first `n` rows of the whole record set. Rejects anything
    /// that is not a positive integer without touching state. On success all
    /// overrides are dropped and the prompt closes.
    pub fn set_virtual_count<N>(&mut self, n: N) -> Result<(), InvalidCountError>
    where
        N: TryInto<VirtualCount, Error = InvalidCountError>,
    {
        let count = n.try_into().inspect_err(|e| log::debug!("{}", e))?;
        self.selection.set_virtual_count(count);
        self.prompt.open = false;
        Ok(())
    }

    /// Raw text from the count input.
    pub fn on_custom_count_submit(&mut self, input: &str) -> Result<(), InvalidCountError> {
        self.set_virtual_count(input)
    }

    pub fn open_prompt(&mut self) {
        self.prompt.open = true;
    }

    pub fn close_prompt(&mut self) {
        self.prompt.open = false;
    }

    pub fn toggle_prompt(&mut self) {
        self.prompt.open = !self.prompt.open;
    }

    /// Append a typed character to the draft. Only digits are accepted, as
    /// a numeric input would.
    pub fn push_draft(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.prompt.draft.push(c);
        }
    }

    pub fn pop_draft(&mut self) {
        self.prompt.draft.pop();
    }

    /// Submit the draft. On error the prompt stays open and the draft is kept.
    pub fn submit_prompt(&mut self) -> Result<(), InvalidCountError> {
        let draft = self.prompt.draft.clone();
        self.on_custom_count_submit(&draft)
    }

    // ── Derived state ───────────────────────────────────────────────

    /// Selected records of the committed page, in page order.
    pub fn selected(&self) -> Vec<&R> {
        self.navigator
            .window()
            .map(|w| self.selection.selected(w))
            .unwrap_or_default()
    }

    pub fn total_selected(&self) -> u64 {
        self.selection.total_selected()
    }

    pub fn virtual_count(&self) -> u64 {
        self.selection.virtual_count()
    }

    pub fn footer(&self) -> String {
        page::footer_text(
            self.navigator.current_page(),
            self.navigator.page_size(),
            self.navigator.total_count(),
        )
    }

    pub fn display_state(&self) -> DisplayState<'_, R> {
        let rows = self
            .navigator
            .window()
            .map(|w| self.selection.rows(w))
            .unwrap_or_default();
        let error = match self.navigator.state() {
            LoadState::Failed(err) => Some(err),
            _ => None,
        };
        DisplayState {
            rows,
            loading: self.navigator.is_loading(),
            error,
            page: self.navigator.current_page(),
            page_count: self.navigator.page_count(),
            total_count: self.navigator.total_count(),
            total_selected: self.total_selected(),
            footer: self.footer(),
        }
    }
}

/// The committed window, if edits may be applied to it right now.
fn editable<R: Record>(navigator: &PageNavigator<R>) -> Result<&PageWindow<R>, SelectionError> {
    match (navigator.state(), navigator.window()) {
        (LoadState::Loaded, Some(window)) => Ok(window),
        _ => Err(SelectionError::NotLoaded),
    }
}
