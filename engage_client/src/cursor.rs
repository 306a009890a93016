//! Offset/count paging over a search endpoint.
//!
//! The cursor requests `(offset, count)` windows one after another:
//! - `offset` advances by the number of records actually returned
//! - the next `count` is the size of the page just received
//! - it stops on a page whose reported count is zero, or on the first failure
//!
//! A short page is not treated as the end. The request after it is made with
//! the short page's size, and only an empty answer stops the loop.

use log::error;

use crate::error::ApiError;

/// One page as the server answered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Offset the page was requested at.
    pub offset: u64,
    /// Count the server reported for this page. Zero means no more data.
    pub reported_count: u64,
    pub records: Vec<T>,
}

/// Something that can answer `(offset, count)` window requests.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    type Record;

    async fn fetch_page(&mut self, offset: u64, count: u64) -> Result<Page<Self::Record>, ApiError>;
}

/// Forward-only, single-use walk over a [`PageSource`].
pub struct PagedCursor<S> {
    source: S,
    offset: u64,
    count: u64,
    done: bool,
    failure: Option<ApiError>,
}

impl<S: PageSource> PagedCursor<S> {
    pub fn new(source: S, page_size: u64) -> Self {
        Self {
            source,
            offset: 0,
            count: page_size,
            done: page_size == 0,
            failure: None,
        }
    }

    /// Offset of the next window; after the walk ends, the total number of
    /// records seen.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The error that ended the walk, if it did not end on an empty page.
    pub fn failure(&self) -> Option<&ApiError> {
        self.failure.as_ref()
    }

    /// Fetches the next non-empty page, or `None` once the walk is over.
    /// Failures are logged and end the walk like an empty page would.
    pub async fn next_page(&mut self) -> Option<Page<S::Record>> {
        if self.done {
            return None;
        }

        let page = match self.source.fetch_page(self.offset, self.count).await {
            Ok(page) => page,
            Err(err) => {
                error!("search at offset {} failed: {}", self.offset, err);
                self.failure = Some(err);
                self.done = true;
                return None;
            }
        };

        if page.reported_count == 0 {
            self.done = true;
            return None;
        }

        let returned = page.records.len() as u64;
        self.offset += returned;
        self.count = returned;
        if returned == 0 {
            self.done = true;
        }

        Some(Page {
            offset: self.offset - returned,
            ..page
        })
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
