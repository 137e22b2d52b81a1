//! Page navigation with superseding requests.
//!
//! Every navigation issues a [`PageRequest`] stamped with a sequence number.
//! Responses come back in any order; only the one carrying the latest
//! sequence number is committed. Older responses are dropped on arrival,
//! the transport is never asked to cancel anything.

use crate::error::{FetchError, NavigationError};
use crate::page::{self, Page, PageWindow};
use crate::record::Record;

/// A page fetch the caller must run and answer with [`PageRequest::respond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn respond<R>(&self, result: Result<Page<R>, FetchError>) -> PageResponse<R> {
        PageResponse {
            seq: self.seq,
            page: self.page,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<R> {
    pub seq: u64,
    pub page: usize,
    pub result: Result<Page<R>, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading { seq: u64, page: usize },
    Loaded,
    /// Latest request failed. The previous window, if any, is still held.
    Failed(FetchError),
}

/// What [`PageNavigator::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed { page: usize },
    Failed(FetchError),
    /// A newer request was issued after this one; the response was dropped.
    Stale { seq: u64, latest: u64 },
}

#[derive(Debug)]
pub struct PageNavigator<R> {
    page_size: usize,
    latest_seq: u64,
    requested_page: Option<usize>,
    state: LoadState,
    window: Option<PageWindow<R>>,
    total_count: u64,
}

impl<R: Record> PageNavigator<R> {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            latest_seq: 0,
            requested_page: None,
            state: LoadState::Idle,
            window: None,
            total_count: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded)
    }

    /// The committed window. Survives failed and in-flight loads.
    pub fn window(&self) -> Option<&PageWindow<R>> {
        self.window.as_ref()
    }

    /// Total record count from the last committed page.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Page shown by the paginator: the last one requested, else 1.
    pub fn current_page(&self) -> usize {
        self.requested_page.unwrap_or(1)
    }

    pub fn page_count(&self) -> usize {
        page::page_count(self.total_count, self.page_size)
    }

    /// Pages are 1-based and their first row must have a rank that fits in `u64`.
    pub fn go_to_page(&mut self, page: usize) -> Result<PageRequest, NavigationError> {
        if page::first_rank(page, self.page_size).is_none() {
            return Err(NavigationError::InvalidPage(page));
        }
        Ok(self.issue(page))
    }

    fn issue(&mut self, page: usize) -> PageRequest {
        self.latest_seq += 1;
        self.requested_page = Some(page);
        self.state = LoadState::Loading {
            seq: self.latest_seq,
            page,
        };
        log::debug!("request #{} for page {}", self.latest_seq, page);
        PageRequest {
            seq: self.latest_seq,
            page,
            page_size: self.page_size,
        }
    }

    /// Re-issue the last requested page. `None` before the first request.
    pub fn retry(&mut self) -> Option<PageRequest> {
        let page = self.requested_page?;
        Some(self.issue(page))
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        let current = self.current_page();
        if current >= self.page_count() {
            return None;
        }
        Some(self.issue(current + 1))
    }

    pub fn prev_page(&mut self) -> Option<PageRequest> {
        let current = self.current_page();
        if current <= 1 {
            return None;
        }
        Some(self.issue(current - 1))
    }

    pub fn first_page(&mut self) -> PageRequest {
        self.issue(1)
    }

    pub fn last_page(&mut self) -> PageRequest {
        let last = self.page_count();
        self.issue(last)
    }

    /// Apply a response. Only the latest request can change state.
    pub fn complete(&mut self, response: PageResponse<R>) -> LoadOutcome {
        let in_flight = matches!(self.state, LoadState::Loading { seq, .. } if seq == response.seq);
        if response.seq != self.latest_seq || !in_flight {
            log::debug!(
                "dropping stale response #{} for page {} (latest #{})",
                response.seq,
                response.page,
                self.latest_seq
            );
            return LoadOutcome::Stale {
                seq: response.seq,
                latest: self.latest_seq,
            };
        }

        match response.result {
            Ok(Page { records, total_count }) => {
                log::debug!(
                    "committed page {} ({} records, {} total)",
                    response.page,
                    records.len(),
                    total_count
                );
                self.window = Some(PageWindow::new(response.page, self.page_size, records));
                self.total_count = total_count;
                self.state = LoadState::Loaded;
                LoadOutcome::Committed { page: response.page }
            }
            Err(err) => {
                log::info!("page {} failed to load: {}", response.page, err);
                self.state = LoadState::Failed(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u64);

    impl Record for Row {
        fn id(&self) -> RecordId {
            RecordId(self.0)
        }
    }

    fn page_of(page: usize, total: u64) -> Page<Row> {
        let first = ((page - 1) * 12 + 1) as u64;
        let last = (first + 11).min(total);
        Page {
            records: (first..=last).map(Row).collect(),
            total_count: total,
        }
    }

    #[test]
    fn unaddressable_pages_rejected() {
        let mut nav = PageNavigator::<Row>::new(12);
        assert_eq!(nav.go_to_page(0), Err(NavigationError::InvalidPage(0)));
        assert_eq!(nav.go_to_page(usize::MAX), Err(NavigationError::InvalidPage(usize::MAX)));
        assert_eq!(nav.state(), &LoadState::Idle);
    }

    #[test]
    fn commit_replaces_window() {
        let mut nav = PageNavigator::new(12);
        let req = nav.go_to_page(1).unwrap();
        assert!(nav.is_loading());
        assert_eq!(nav.complete(req.respond(Ok(page_of(1, 30)))), LoadOutcome::Committed { page: 1 });
        assert!(nav.is_loaded());
        assert_eq!(nav.total_count(), 30);
        assert_eq!(nav.page_count(), 3);

        let req = nav.go_to_page(3).unwrap();
        nav.complete(req.respond(Ok(page_of(3, 30))));
        let w = nav.window().unwrap();
        assert_eq!(w.page(), 3);
        assert_eq!(w.len(), 6);
    }

    #[test]
    fn late_response_for_older_request_is_dropped() {
        let mut nav = PageNavigator::new(12);
        let two = nav.go_to_page(2).unwrap();
        let three = nav.go_to_page(3).unwrap();

        assert_eq!(nav.complete(three.respond(Ok(page_of(3, 40)))), LoadOutcome::Committed { page: 3 });
        assert_eq!(
            nav.complete(two.respond(Ok(page_of(2, 40)))),
            LoadOutcome::Stale { seq: two.seq, latest: three.seq }
        );
        assert_eq!(nav.window().unwrap().page(), 3);
    }

    #[test]
    fn early_response_for_older_request_is_dropped() {
        let mut nav = PageNavigator::new(12);
        let two = nav.go_to_page(2).unwrap();
        let three = nav.go_to_page(3).unwrap();

        assert!(matches!(nav.complete(two.respond(Ok(page_of(2, 40)))), LoadOutcome::Stale { .. }));
        assert!(nav.window().is_none());
        assert!(nav.is_loading());
        nav.complete(three.respond(Ok(page_of(3, 40))));
        assert_eq!(nav.window().unwrap().page(), 3);
    }

    #[test]
    fn duplicate_delivery_is_stale() {
        let mut nav = PageNavigator::new(12);
        let req = nav.go_to_page(1).unwrap();
        nav.complete(req.respond(Ok(page_of(1, 30))));
        assert!(matches!(nav.complete(req.respond(Ok(page_of(1, 30)))), LoadOutcome::Stale { .. }));
    }

    #[test]
    fn failure_keeps_previous_window() {
        let mut nav = PageNavigator::new(12);
        let req = nav.go_to_page(1).unwrap();
        nav.complete(req.respond(Ok(page_of(1, 30))));

        let req = nav.go_to_page(2).unwrap();
        let err = FetchError::Network("connection reset".into());
        assert_eq!(nav.complete(req.respond(Err(err.clone()))), LoadOutcome::Failed(err.clone()));
        assert_eq!(nav.state(), &LoadState::Failed(err));
        assert_eq!(nav.window().unwrap().page(), 1);
        assert_eq!(nav.current_page(), 2);

        let retry = nav.retry().unwrap();
        assert_eq!(retry.page, 2);
        nav.complete(retry.respond(Ok(page_of(2, 30))));
        assert_eq!(nav.window().unwrap().page(), 2);
    }

    #[test]
    fn next_and_prev_stay_in_bounds() {
        let mut nav = PageNavigator::new(12);
        assert!(nav.prev_page().is_none());
        let req = nav.first_page();
        nav.complete(req.respond(Ok(page_of(1, 20))));
        let next = nav.next_page().unwrap();
        assert_eq!(next.page, 2);
        nav.complete(next.respond(Ok(page_of(2, 20))));
        assert!(nav.next_page().is_none());
        assert_eq!(nav.prev_page().unwrap().page, 1);
    }

    #[test]
    fn retry_before_any_request() {
        let mut nav = PageNavigator::<Row>::new(12);
        assert!(nav.retry().is_none());
    }
}
