//! Paged donation search, printed one activity per line.

use std::io::{self, Write};

use log::info;

use crate::client::EngageApi;
use crate::config::SearchConfig;
use crate::cursor::{Page, PageSource, PagedCursor};
use crate::error::ApiError;
use crate::model::{Activity, ActivitySearch, LEGACY_MODIFIED_TO_KEY, MODIFIED_TO_KEY};
use crate::printer;

/// Serves activity search windows for one login's filter.
pub struct ActivitySource<'a, A> {
    api: &'a A,
    config: &'a SearchConfig,
}

impl<'a, A: EngageApi> ActivitySource<'a, A> {
    pub fn new(api: &'a A, config: &'a SearchConfig) -> Self {
        Self { api, config }
    }

    fn request(&self, offset: u64, count: u64) -> ActivitySearch {
        ActivitySearch {
            activity_type: self.config.identifier_type.clone(),
            modified_from: self.config.modified_from.clone(),
            modified_to: self.config.modified_to.clone(),
            modified_to_key: if self.config.legacy_modified_to_key {
                LEGACY_MODIFIED_TO_KEY
            } else {
                MODIFIED_TO_KEY
            },
            offset,
            count,
        }
    }
}

impl<A: EngageApi> PageSource for ActivitySource<'_, A> {
    type Record = Activity;

    async fn fetch_page(&mut self, offset: u64, count: u64) -> Result<Page<Activity>, ApiError> {
        let page = self.api.search_activities(&self.request(offset, count)).await?;
        Ok(Page {
            offset,
            reported_count: page.count,
            records: page.activities,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub pages: u64,
    pub records: u64,
    /// True when the walk ended on a failed request instead of an empty page.
    pub interrupted: bool,
}

/// Walks every activity matching `config` and writes one line per activity,
/// followed by the end-of-search marker.
pub async fn print_all_activities<A, W>(
    api: &A,
    config: &SearchConfig,
    out: &mut W,
) -> io::Result<SearchSummary>
where
    A: EngageApi,
    W: Write,
{
    let mut cursor = PagedCursor::new(ActivitySource::new(api, config), u64::from(config.page_size));
    let mut summary = SearchSummary::default();

    while let Some(page) = cursor.next_page().await {
        summary.pages += 1;
        for (index, activity) in page.records.iter().enumerate() {
            writeln!(out, "{}", printer::activity_line(page.offset, index, activity))?;
            if config.show_transactions {
                for transaction in &activity.transactions {
                    writeln!(out, "{}", printer::transaction_line(transaction))?;
                }
            }
            summary.records += 1;
        }
    }

    writeln!(out, "{}", printer::end_of_search_line(cursor.offset()))?;
    summary.interrupted = cursor.failure().is_some();
    info!("{} activities in {} page(s)", summary.records, summary.pages);
    Ok(summary)
}
