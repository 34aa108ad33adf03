use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use giantbomb::VideoFilter;
use itertools::Itertools;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

use crate::cache::ResumeCache;
use crate::errors::{Error, Result};
use crate::models::{LiveStream, SearchPage, ShowRecord, VideoRecord};
use crate::resume::{ResumeTimeProvider, ShowProvider};
use crate::source::CatalogSource;

pub const DEFAULT_RECENTLY_WATCHED_LIMIT: usize = 100;

/// Fetches from a [`CatalogSource`] and keeps a [`ResumeCache`] up to date.
#[derive(Debug)]
pub struct CatalogClient<S> {
    source: Arc<S>,
    cache: ResumeCache,
}

impl<S> Clone for CatalogClient<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
        }
    }
}

impl<S> CatalogClient<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(source: S, cache: ResumeCache) -> Self {
        Self {
            source: Arc::new(source),
            cache,
        }
    }

    pub fn cache(&self) -> &ResumeCache {
        &self.cache
    }

    /// Warms the cache with the latest videos and the saved positions.
    ///
    /// # Errors
    /// [`Error::Network`]: If either request fails.
    pub async fn prefetch(&self) -> Result<()> {
        tokio::try_join!(
            self.fetch_videos(None, None, 0),
            self.fetch_recently_watched(DEFAULT_RECENTLY_WATCHED_LIMIT),
        )?;
        Ok(())
    }

    /// Playable videos matching `filter`, in server order.
    ///
    /// # Errors
    /// [`Error::Network`]: If the request fails. The cache is not touched.
    #[instrument(skip(self))]
    pub async fn fetch_videos(
        &self,
        filter: Option<VideoFilter>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<VideoRecord>> {
        let videos = self.source.fetch_video_list(filter, limit, offset).await?;
        trace!("fetched {} videos", videos.len());
        for video in &videos {
            self.cache.store_video(video.clone());
        }
        Ok(videos.into_iter().filter(VideoRecord::is_available).collect())
    }

    /// # Errors
    /// [`Error::Network`]: If the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_shows(&self) -> Result<Vec<ShowRecord>> {
        let shows = self.source.fetch_show_list().await?;
        for show in &shows {
            self.cache.store_show(show.clone());
        }
        Ok(shows)
    }

    /// The cached copy of a video, fetched only on the first request.
    ///
    /// # Errors
    /// [`Error::Network`]: If the video was not cached and the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_video_detail(&self, id: u32) -> Result<VideoRecord> {
        if let Some(video) = self.cache.lookup_video(id) {
            return Ok(video);
        }
        let video = self.source.fetch_video_by_id(id).await?;
        self.cache.store_video(video.clone());
        Ok(video)
    }

    /// Videos to continue watching, most recently watched first.
    ///
    /// Every saved position is imported into the cache, but only the `limit`
    /// most recent are resolved to videos, and only resumable ones are
    /// returned. Positions saved for videos the service no longer has are
    /// skipped.
    ///
    /// # Errors
    /// [`Error::Network`]: If the saved positions or any of the videos cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch_recently_watched(&self, limit: usize) -> Result<Vec<VideoRecord>> {
        let issued = Utc::now();
        let mut saved = self.source.fetch_saved_progress().await?;
        saved.sort_by_key(|p| Reverse(p.saved_at));
        let saved: Vec<_> = saved.into_iter().unique_by(|p| p.video_id).collect();

        let imported = saved
            .iter()
            .filter(|p| self.cache.record_watch_progress_since(p, issued))
            .count();
        trace!("imported {imported} of {} saved positions", saved.len());

        let details = saved
            .iter()
            .take(limit)
            .map(|p| self.resolve_saved(p.video_id));
        let videos = try_join_all(details).await?;
        Ok(videos
            .into_iter()
            .flatten()
            .filter(|v| v.is_available() && self.is_resumable(v))
            .collect())
    }

    async fn resolve_saved(&self, video_id: u32) -> Result<Option<VideoRecord>> {
        match self.fetch_video_detail(video_id).await {
            Ok(video) => Ok(Some(video)),
            Err(Error::Network(giantbomb::Error::NotFound)) => {
                debug!(video_id, "skipping saved position of a removed video");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Records `position` locally, then reports it to the service in the
    /// background. Must be called from within a tokio runtime.
    ///
    /// The returned task never fails; a rejected save is only logged.
    pub fn save_time(&self, video: &VideoRecord, position: f64) -> JoinHandle<()> {
        self.cache.set_resume_point(video.id, position);
        let source = Arc::clone(&self.source);
        let video_id = video.id;
        tokio::spawn(async move {
            if let Err(err) = source.post_save_time(video_id, position).await {
                warn!(video_id, "failed to save playback position: {err}");
            }
        })
    }

    /// Marks `video` as finished, locally and then on the service.
    pub fn mark_watched(&self, video: &VideoRecord) -> JoinHandle<()> {
        self.cache.set_resume_point(video.id, video.duration_seconds);
        let source = Arc::clone(&self.source);
        let video_id = video.id;
        tokio::spawn(async move {
            if let Err(err) = source.post_mark_watched(video_id).await {
                warn!(video_id, "failed to mark video as watched: {err}");
            }
        })
    }

    /// # Errors
    /// [`Error::Network`]: If the request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let page = self.source.search(query, page).await?;
        for video in &page.results {
            self.cache.store_video(video.clone());
        }
        Ok(page)
    }

    /// # Errors
    /// [`Error::NoLiveVideo`]: If nothing is broadcasting.
    /// [`Error::Network`]: If the request fails.
    pub async fn live_video(&self) -> Result<LiveStream> {
        self.source
            .fetch_live_video()
            .await?
            .ok_or(Error::NoLiveVideo)
    }
}

impl<S> ResumeTimeProvider for CatalogClient<S> {
    fn resume_point(&self, video: &VideoRecord) -> Option<f64> {
        self.cache.resume_point(video)
    }
}

impl<S> ShowProvider for CatalogClient<S> {
    fn show(&self, id: u32) -> Option<ShowRecord> {
        self.cache.lookup_show(id)
    }
}
