use thiserror::Error;

/// A page could not be loaded. Never fatal: the previously committed page
/// stays on screen and navigation can be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body could not be decoded into a page.
    #[error("parse error: {0}")]
    Parse(String),
}

/// User-submitted row count was zero, negative, or not an integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid row count {input:?}: expected a positive whole number")]
pub struct InvalidCountError {
    pub input: String,
}

impl InvalidCountError {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Page indices are 1-based, and the first row of the page needs a rank that fits in `u64`.
    #[error("invalid page {0}: pages start at 1 and must be in range")]
    InvalidPage(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Selection edits are only accepted once the requested page has committed.
    #[error("no page is loaded")]
    NotLoaded,
}
