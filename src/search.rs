use crate::catalog::CatalogClient;
use crate::errors::Result;
use crate::models::{SearchPage, VideoRecord};
use crate::source::CatalogSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("a search for this query is already in progress")]
    Pending,
    #[error("no search has been started")]
    Idle,
    #[error("the query is empty")]
    EmptyQuery,
    #[error("all results have been loaded")]
    NoMoreResults,
    #[error("the query changed before the results arrived")]
    Superseded,
}

/// A page request issued by a [`SearchSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
}

impl SearchRequest {
    /// # Errors
    /// [`crate::Error::Network`]: If the request fails.
    pub async fn send<S>(&self, client: &CatalogClient<S>) -> Result<SearchPage>
    where
        S: CatalogSource + 'static,
    {
        client.search(&self.query, self.page).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    /// Waiting for `page`; `results` holds the pages loaded so far.
    Searching {
        query: String,
        page: u32,
        results: Vec<VideoRecord>,
        total: u32,
    },
    Loaded {
        query: String,
        page: u32,
        results: Vec<VideoRecord>,
        total: u32,
    },
}

/// Paged search over one query at a time.
///
/// Requests are handed out as [`SearchRequest`]s so the caller decides how to
/// run them; a response is only accepted while its query is still the active
/// one.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    state: SearchState,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match &self.state {
            SearchState::Idle => None,
            SearchState::Searching { query, .. } | SearchState::Loaded { query, .. } => {
                Some(query)
            }
        }
    }

    #[must_use]
    pub fn results(&self) -> &[VideoRecord] {
        match &self.state {
            SearchState::Idle => &[],
            SearchState::Searching { results, .. } | SearchState::Loaded { results, .. } => {
                results
            }
        }
    }

    /// Whether `index` is the last loaded result, the cue to load more.
    #[must_use]
    pub fn is_last_index(&self, index: usize) -> bool {
        let len = self.results().len();
        len > 0 && index == len - 1
    }

    pub fn clear(&mut self) {
        self.state = SearchState::Idle;
    }

    /// Starts over with `query`, discarding any loaded results.
    ///
    /// # Errors
    /// [`SearchError::Pending`]: If `query` is already being searched.
    /// [`SearchError::EmptyQuery`]: If `query` is blank; the session is cleared.
    pub fn start<Q>(&mut self, query: Q) -> Result<SearchRequest, SearchError>
    where
        Q: Into<String>,
    {
        let query = query.into();
        if query.trim().is_empty() {
            self.clear();
            return Err(SearchError::EmptyQuery);
        }
        if let SearchState::Searching { query: active, .. } = &self.state {
            if *active == query {
                return Err(SearchError::Pending);
            }
        }
        self.state = SearchState::Searching {
            query: query.clone(),
            page: 1,
            results: Vec::new(),
            total: 0,
        };
        Ok(SearchRequest { query, page: 1 })
    }

    /// Requests the page after the last loaded one.
    ///
    /// # Errors
    /// [`SearchError::Idle`]: If no query was started.
    /// [`SearchError::Pending`]: If a request is still outstanding.
    /// [`SearchError::NoMoreResults`]: If every result is already loaded.
    pub fn next_page(&mut self) -> Result<SearchRequest, SearchError> {
        match std::mem::take(&mut self.state) {
            SearchState::Idle => Err(SearchError::Idle),
            searching @ SearchState::Searching { .. } => {
                self.state = searching;
                Err(SearchError::Pending)
            }
            SearchState::Loaded {
                query,
                page,
                results,
                total,
            } => {
                if results.len() >= total as usize {
                    self.state = SearchState::Loaded {
                        query,
                        page,
                        results,
                        total,
                    };
                    return Err(SearchError::NoMoreResults);
                }
                let request = SearchRequest {
                    query: query.clone(),
                    page: page + 1,
                };
                self.state = SearchState::Searching {
                    query,
                    page: page + 1,
                    results,
                    total,
                };
                Ok(request)
            }
        }
    }

    /// Accepts the response to `request` and returns the newly added results.
    ///
    /// # Errors
    /// [`SearchError::Superseded`]: If `request` is not the one the session is
    /// waiting for; the response is discarded.
    pub fn apply(
        &mut self,
        request: &SearchRequest,
        response: SearchPage,
    ) -> Result<&[VideoRecord], SearchError> {
        if !self.is_waiting_for(request) {
            return Err(SearchError::Superseded);
        }
        let SearchState::Searching { query, results, .. } = std::mem::take(&mut self.state)
        else {
            return Err(SearchError::Superseded);
        };
        let mut results = results;
        let start = results.len();
        results.extend(response.results);
        self.state = SearchState::Loaded {
            query,
            page: request.page,
            results,
            total: response.total_count,
        };
        Ok(&self.results()[start..])
    }

    /// Gives up on `request` after it failed, so the page can be retried.
    pub fn abandon(&mut self, request: &SearchRequest) {
        if !self.is_waiting_for(request) {
            return;
        }
        if let SearchState::Searching {
            query,
            page,
            results,
            total,
        } = std::mem::take(&mut self.state)
        {
            self.state = if page > 1 {
                SearchState::Loaded {
                    query,
                    page: page - 1,
                    results,
                    total,
                }
            } else {
                SearchState::Idle
            };
        }
    }

    fn is_waiting_for(&self, request: &SearchRequest) -> bool {
        matches!(
            &self.state,
            SearchState::Searching { query, page, .. }
                if *query == request.query && *page == request.page
        )
    }
}
