//! `artview-core`: virtual row selection over a paged record set.
//!
//! Pure engine crate: holds one page at a time, tracks a "first N rows"
//! intent plus per-row overrides, and derives what is selected. No network
//! or terminal dependencies; loaders plug in through [`PageLoader`].

pub mod error;
pub mod fetch;
pub mod loader;
pub mod navigator;
pub mod page;
pub mod reconciler;
pub mod record;
pub mod selection;

pub use error::{FetchError, InvalidCountError, NavigationError, SelectionError};
pub use loader::{PageLoader, VecLoader};
pub use navigator::{LoadOutcome, LoadState, PageNavigator, PageRequest, PageResponse};
pub use page::{Page, PageWindow};
pub use reconciler::{CountPrompt, DisplayState, SelectionReconciler};
pub use record::{Record, RecordId};
pub use selection::{RowView, Selection, VirtualCount};
