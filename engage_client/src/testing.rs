//! Scripted stand-in for the Engage API used by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use reqwest::StatusCode;

use crate::client::EngageApi;
use crate::error::ApiError;
use crate::model::{ActivityPage, ActivitySearch, Supporter, SupporterList, SupporterSearch};

/// Answers each call from its own queue and records what it was sent.
/// An exhausted queue answers with a 500.
#[derive(Default)]
pub struct ScriptedApi {
    pub activity_pages: RefCell<VecDeque<Result<ActivityPage, ApiError>>>,
    pub supporter_searches: RefCell<VecDeque<SupporterList>>,
    pub update_responses: RefCell<VecDeque<SupporterList>>,

    pub activity_requests: RefCell<Vec<ActivitySearch>>,
    pub supporter_requests: RefCell<Vec<SupporterSearch>>,
    pub updates_sent: RefCell<Vec<Vec<Supporter>>>,
}

impl ScriptedApi {
    pub fn with_activity_pages(pages: Vec<ActivityPage>) -> Self {
        let api = Self::default();
        api.activity_pages.borrow_mut().extend(pages.into_iter().map(Ok));
        api
    }

    pub fn calls(&self) -> usize {
        self.activity_requests.borrow().len()
            + self.supporter_requests.borrow().len()
            + self.updates_sent.borrow().len()
    }
}

fn exhausted() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "script exhausted".to_string(),
    }
}

impl EngageApi for ScriptedApi {
    async fn search_activities(&self, search: &ActivitySearch) -> Result<ActivityPage, ApiError> {
        self.activity_requests.borrow_mut().push(search.clone());
        self.activity_pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn search_supporters(&self, search: &SupporterSearch) -> Result<SupporterList, ApiError> {
        self.supporter_requests.borrow_mut().push(search.clone());
        self.supporter_searches.borrow_mut().pop_front().ok_or_else(exhausted)
    }

    async fn update_supporters(&self, supporters: &[Supporter]) -> Result<SupporterList, ApiError> {
        self.updates_sent.borrow_mut().push(supporters.to_vec());
        self.update_responses.borrow_mut().pop_front().ok_or_else(exhausted)
    }
}
