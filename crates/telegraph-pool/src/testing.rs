//! Scripted `Transport` for tests

use std::collections::{HashSet, VecDeque};
use std::future::ready;
use std::sync::Mutex;

use telegraph_api::{
    AccountInfo, AccountProfile, Document, Page, TOKEN_LENGTH, Transport, TransportError,
    TransportFuture,
};
use tokio::time::Instant;

/// A well-formed token distinguishable by `n`.
pub(crate) fn valid_token(n: usize) -> String {
    format!("{n:0>width$}", width = TOKEN_LENGTH)
}

/// One recorded `create_page` call.
#[derive(Debug, Clone)]
pub(crate) struct PageCall {
    pub token: String,
    pub at: Instant,
    pub title: String,
    pub content: String,
}

#[derive(Default)]
struct State {
    page_results: VecDeque<telegraph_api::Result<Page>>,
    page_failure: Option<TransportError>,
    page_calls: Vec<PageCall>,
    accounts_created: usize,
    account_creation_error: Option<TransportError>,
    account_info_error: Option<TransportError>,
    rejected_tokens: HashSet<String>,
}

/// Transport double: `create_page` replays queued results (then succeeds),
/// `create_account` issues sequential well-formed tokens.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    state: Mutex<State>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document() -> Document {
        Document {
            title: "Weekly digest".into(),
            author_name: "Example Feed".into(),
            author_url: "https://example.com".into(),
            content: "<p>body</p>".into(),
        }
    }

    /// Queue the result of the next unscripted `create_page` call.
    pub fn push_page_result(&self, result: telegraph_api::Result<Page>) {
        self.state.lock().unwrap().page_results.push_back(result);
    }

    /// Make every `create_page` call without a queued result fail.
    pub fn fail_pages_with(&self, error: TransportError) {
        self.state.lock().unwrap().page_failure = Some(error);
    }

    pub fn fail_account_creation(&self, error: TransportError) {
        self.state.lock().unwrap().account_creation_error = Some(error);
    }

    pub fn fail_account_info(&self, error: TransportError) {
        self.state.lock().unwrap().account_info_error = Some(error);
    }

    /// `get_account_info` answers `ACCESS_TOKEN_INVALID` for this token.
    pub fn reject_token(&self, token: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_tokens
            .insert(token.to_string());
    }

    pub fn page_calls(&self) -> Vec<PageCall> {
        self.state.lock().unwrap().page_calls.clone()
    }

    pub fn accounts_created(&self) -> usize {
        self.state.lock().unwrap().accounts_created
    }
}

impl Transport for ScriptedTransport {
    fn create_page<'a>(
        &'a self,
        access_token: &'a str,
        page: &'a Document,
    ) -> TransportFuture<'a, Page> {
        let mut state = self.state.lock().unwrap();
        state.page_calls.push(PageCall {
            token: access_token.to_string(),
            at: Instant::now(),
            title: page.title.clone(),
            content: page.content.clone(),
        });
        let n = state.page_calls.len();
        let result = match state.page_results.pop_front() {
            Some(result) => result,
            None => match &state.page_failure {
                Some(error) => Err(error.clone()),
                None => Ok(Page {
                    path: format!("page-{n}"),
                    url: format!("https://telegra.ph/page-{n}"),
                    title: "Weekly digest".into(),
                }),
            },
        };
        Box::pin(ready(result))
    }

    fn create_account<'a>(&'a self, _profile: &'a AccountProfile) -> TransportFuture<'a, String> {
        let mut state = self.state.lock().unwrap();
        let result = match &state.account_creation_error {
            Some(error) => Err(error.clone()),
            None => {
                state.accounts_created += 1;
                Ok(valid_token(1000 + state.accounts_created))
            }
        };
        Box::pin(ready(result))
    }

    fn get_account_info<'a>(&'a self, access_token: &'a str) -> TransportFuture<'a, AccountInfo> {
        let state = self.state.lock().unwrap();
        let result = if let Some(error) = &state.account_info_error {
            Err(error.clone())
        } else if state.rejected_tokens.contains(access_token) {
            Err(TransportError::Api("ACCESS_TOKEN_INVALID".into()))
        } else {
            Ok(AccountInfo {
                short_name: "RSStT".into(),
                author_name: String::new(),
                author_url: String::new(),
            })
        };
        Box::pin(ready(result))
    }
}
