//! Background page fetches.
//!
//! Display loops cannot block on the network, so each [`PageRequest`] runs
//! on its own thread and reports back over a channel. Nothing here decides
//! which response wins; that is [`crate::PageNavigator::complete`]'s job.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::loader::PageLoader;
use crate::navigator::{PageRequest, PageResponse};

/// Run `request` against `loader` on a worker thread and send the response
/// to `tx`. A closed receiver means the session ended; the response is
/// dropped.
pub fn dispatch<R, L>(loader: Arc<L>, request: PageRequest, tx: Sender<PageResponse<R>>) -> JoinHandle<()>
where
    R: Send + 'static,
    L: PageLoader<R> + ?Sized + 'static,
{
    thread::spawn(move || {
        let result = loader.fetch_page(request.page, request.page_size);
        if tx.send(request.respond(result)).is_err() {
            log::debug!("receiver gone, dropping response #{}", request.seq);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::page::Page;
    use std::sync::mpsc;

    struct Failing;

    impl PageLoader<u32> for Failing {
        fn fetch_page(&self, page: usize, _page_size: usize) -> Result<Page<u32>, FetchError> {
            Err(FetchError::Http { status: 503, body: format!("page {page} unavailable") })
        }
    }

    #[test]
    fn failure_travels_back_with_request_identity() {
        let (tx, rx) = mpsc::channel::<PageResponse<u32>>();
        let req = PageRequest { seq: 7, page: 4, page_size: 12 };
        dispatch(Arc::new(Failing), req, tx).join().unwrap();
        let resp = rx.recv().unwrap();
        assert_eq!(resp.seq, 7);
        assert_eq!(resp.page, 4);
        assert!(matches!(resp.result, Err(FetchError::Http { status: 503, .. })));
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (tx, rx) = mpsc::channel::<PageResponse<u32>>();
        drop(rx);
        let req = PageRequest { seq: 1, page: 1, page_size: 12 };
        assert!(dispatch(Arc::new(Failing), req, tx).join().is_ok());
    }
}
