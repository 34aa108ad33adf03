mod date;
pub mod filter;
pub mod models;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

pub use filter::{KeyShow, VideoFilter};

const DEFAULT_BASE_URL: &str = "https://www.giantbomb.com/api/";

#[derive(Clone)]
pub enum Authorization {
    Bearer(String),
    ApiKey(String),
}

// Never print the credential itself.
impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Bearer(_) => f.write_str("Bearer(..)"),
            Authorization::ApiKey(_) => f.write_str("ApiKey(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    auth: Authorization,
    base_url: Url,
    reqwest: reqwest::Client,
}

impl Client {
    /// Creates a client for the public catalog API.
    ///
    /// # Panics
    /// Never, the default base url is a valid constant.
    #[must_use]
    pub fn new(auth: Authorization, reqwest: reqwest::Client) -> Self {
        let base_url = DEFAULT_BASE_URL.parse().expect("default base url is valid");
        Self::with_base_url(auth, reqwest, base_url)
    }

    #[must_use]
    pub fn with_base_url(auth: Authorization, reqwest: reqwest::Client, base_url: Url) -> Self {
        Client {
            auth,
            base_url,
            reqwest,
        }
    }

    fn endpoint(&self, resource: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(resource)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Authorization::ApiKey(key) = &self.auth {
                pairs.append_pair("api_key", key);
            }
            pairs.append_pair("format", "json");
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        tracing::debug!(path = url.path(), "requesting");
        let request = self.reqwest.get(url);
        let request = match &self.auth {
            Authorization::Bearer(token) => request.bearer_auth(token),
            Authorization::ApiKey(_) => request,
        };
        Ok(request.send().await?)
    }
}

/// Envelope the API wraps every payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wrapped<T> {
    #[serde(rename = "number_of_total_results", default)]
    pub total_results: u32,
    #[serde(rename = "number_of_page_results", default)]
    pub page_results: u32,
    pub results: T,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The provided authorization token is invalid")]
    Unauthorized,
    #[error("The requested resource could not be found")]
    NotFound,
    #[error("request failed with status code: {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error(transparent)]
    DeserializationError(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn check_status(res: reqwest::Response) -> Result<reqwest::Response> {
    let status = res.status();
    match status {
        reqwest::StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
        reqwest::StatusCode::NOT_FOUND => Err(Error::NotFound),
        s if !s.is_success() => Err(Error::Status(s)),
        _ => Ok(res),
    }
}

async fn handle_response<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
    let response = check_status(res)?;
    let body = response.text().await?;
    match serde_json::from_str(&body) {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::trace!(body = body, "error deserializing response: {}", e);
            Err(Error::DeserializationError(e))
        }
    }
}

pub mod videos {
    use crate::models::Video;
    use crate::{Client, Result, VideoFilter, Wrapped};
    use url::Url;

    #[derive(Debug, Clone, Default)]
    pub struct Params {
        pub filter: Option<VideoFilter>,
        pub limit: Option<u32>,
        pub offset: u32,
    }

    impl Params {
        pub(crate) fn append_query_params(&self, url: &mut Url) {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("offset", &self.offset.to_string());
            pairs.append_pair("field_list", Video::FIELDS);
            if let Some(filter) = &self.filter {
                pairs.append_pair("filter", &filter.to_string());
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
    }

    /// The most recent videos matching `params`, newest first.
    ///
    /// # Errors
    /// [`crate::Error::Unauthorized`]: If the client is not authorized to make the request.
    /// [`crate::Error::DeserializationError`]: If the response does not match the expected format.
    pub async fn list(client: &Client, params: &Params) -> Result<Vec<Video>> {
        let mut url = client.endpoint("videos")?;
        params.append_query_params(&mut url);
        let response = client.get(url).await?;
        let wrapped: Wrapped<Vec<Video>> = crate::handle_response(response).await?;
        Ok(wrapped.results)
    }

    /// A single video by id.
    ///
    /// # Errors
    /// [`crate::Error::NotFound`]: If no video exists with this id.
    pub async fn single(client: &Client, id: u32) -> Result<Video> {
        let mut url = client.endpoint(&format!("video/{id}"))?;
        url.query_pairs_mut().append_pair("field_list", Video::FIELDS);
        let response = client.get(url).await?;
        let wrapped: Wrapped<Video> = crate::handle_response(response).await?;
        Ok(wrapped.results)
    }
}

pub mod shows {
    use crate::models::Show;
    use crate::{Client, Result, Wrapped};

    /// Every show the catalog knows about, in server order.
    ///
    /// # Errors
    /// [`crate::Error::Unauthorized`]: If the client is not authorized to make the request.
    pub async fn list(client: &Client) -> Result<Vec<Show>> {
        let mut url = client.endpoint("video_shows")?;
        url.query_pairs_mut().append_pair("field_list", Show::FIELDS);
        let response = client.get(url).await?;
        let wrapped: Wrapped<Vec<Show>> = crate::handle_response(response).await?;
        Ok(wrapped.results)
    }
}

pub mod search {
    use crate::models::Video;
    use crate::{Client, Result, Wrapped};

    /// Searches videos. Pages start at 1.
    ///
    /// # Errors
    /// [`crate::Error::Unauthorized`]: If the client is not authorized to make the request.
    pub async fn videos<S>(client: &Client, query: S, page: u32) -> Result<Wrapped<Vec<Video>>>
    where
        S: AsRef<str>,
    {
        let mut url = client.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("query", query.as_ref())
            .append_pair("resources", "video");
        let response = client.get(url).await?;
        crate::handle_response(response).await
    }
}

pub mod saved_times {
    use crate::models::{SavedTime, SavedTimes};
    use crate::{Client, Result};

    /// Every saved playback position of the authorized user.
    ///
    /// # Errors
    /// [`crate::Error::Unauthorized`]: If the client is not authorized to make the request.
    pub async fn all(client: &Client) -> Result<Vec<SavedTime>> {
        let url = client.endpoint("video/get-all-saved-times")?;
        let response = client.get(url).await?;
        let saved: SavedTimes = crate::handle_response(response).await?;
        Ok(saved.saved_times)
    }

    /// Stores a playback position in whole seconds.
    ///
    /// # Errors
    /// [`crate::Error::Status`]: If the server rejected the position.
    pub async fn save(client: &Client, video_id: u32, position: u64) -> Result<()> {
        let mut url = client.endpoint("video/save-time")?;
        url.query_pairs_mut()
            .append_pair("video_id", &video_id.to_string())
            .append_pair("time_to_save", &position.to_string());
        let response = client.get(url).await?;
        crate::check_status(response)?;
        Ok(())
    }

    /// # Errors
    /// [`crate::Error::Status`]: If the server rejected the request.
    pub async fn mark_watched(client: &Client, video_id: u32) -> Result<()> {
        let mut url = client.endpoint("video/mark-watched")?;
        url.query_pairs_mut()
            .append_pair("video_id", &video_id.to_string());
        let response = client.get(url).await?;
        crate::check_status(response)?;
        Ok(())
    }
}

pub mod live {
    use crate::models::{LiveResponse, LiveVideo};
    use crate::{Client, Result};

    /// The current live broadcast, `None` when nothing is live.
    ///
    /// # Errors
    /// [`crate::Error::Unauthorized`]: If the client is not authorized to make the request.
    pub async fn current(client: &Client) -> Result<Option<LiveVideo>> {
        let url = client.endpoint("video/current-live")?;
        let response = client.get(url).await?;
        let live: LiveResponse = crate::handle_response(response).await?;
        Ok(live.video)
    }
}
