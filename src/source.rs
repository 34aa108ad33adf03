use async_trait::async_trait;
use giantbomb::{live, saved_times, search, shows, videos, VideoFilter};

use crate::errors::NetworkError;
use crate::models::{LiveStream, SavedProgressRecord, SearchPage, ShowRecord, VideoRecord};

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Remote side of the catalog. Records arrive decoded; the credential is the
/// implementation's concern.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_video_list(
        &self,
        filter: Option<VideoFilter>,
        limit: Option<u32>,
        offset: u32,
    ) -> NetworkResult<Vec<VideoRecord>>;

    async fn fetch_show_list(&self) -> NetworkResult<Vec<ShowRecord>>;

    async fn fetch_video_by_id(&self, id: u32) -> NetworkResult<VideoRecord>;

    async fn fetch_saved_progress(&self) -> NetworkResult<Vec<SavedProgressRecord>>;

    async fn post_save_time(&self, video_id: u32, position: f64) -> NetworkResult<()>;

    async fn post_mark_watched(&self, video_id: u32) -> NetworkResult<()>;

    async fn search(&self, query: &str, page: u32) -> NetworkResult<SearchPage>;

    /// `None` when nothing is broadcasting.
    async fn fetch_live_video(&self) -> NetworkResult<Option<LiveStream>>;
}

#[async_trait]
impl CatalogSource for giantbomb::Client {
    async fn fetch_video_list(
        &self,
        filter: Option<VideoFilter>,
        limit: Option<u32>,
        offset: u32,
    ) -> NetworkResult<Vec<VideoRecord>> {
        let params = videos::Params {
            filter,
            limit,
            offset,
        };
        let list = videos::list(self, &params).await?;
        Ok(list.into_iter().map(VideoRecord::from).collect())
    }

    async fn fetch_show_list(&self) -> NetworkResult<Vec<ShowRecord>> {
        let list = shows::list(self).await?;
        Ok(list.into_iter().map(ShowRecord::from).collect())
    }

    async fn fetch_video_by_id(&self, id: u32) -> NetworkResult<VideoRecord> {
        Ok(videos::single(self, id).await?.into())
    }

    async fn fetch_saved_progress(&self) -> NetworkResult<Vec<SavedProgressRecord>> {
        let saved = saved_times::all(self).await?;
        Ok(saved.into_iter().map(SavedProgressRecord::from).collect())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn post_save_time(&self, video_id: u32, position: f64) -> NetworkResult<()> {
        // the service stores whole seconds
        saved_times::save(self, video_id, position.max(0.0).floor() as u64).await
    }

    async fn post_mark_watched(&self, video_id: u32) -> NetworkResult<()> {
        saved_times::mark_watched(self, video_id).await
    }

    async fn search(&self, query: &str, page: u32) -> NetworkResult<SearchPage> {
        Ok(search::videos(self, query, page).await?.into())
    }

    async fn fetch_live_video(&self) -> NetworkResult<Option<LiveStream>> {
        Ok(live::current(self).await?.map(LiveStream::from))
    }
}
