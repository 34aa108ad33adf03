use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ahash::HashMap;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use giantbomb::VideoFilter;
use tokio::sync::Notify;

use crate::errors::NetworkError;
use crate::models::{
    Images, LiveStream, Quality, SavedProgressRecord, SearchPage, ShowRecord, VideoRecord,
};
use crate::source::{CatalogSource, NetworkResult};

fn base_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn images() -> Images {
    Images {
        small: "https://example.com/small.jpg".parse().unwrap(),
        medium: "https://example.com/medium.jpg".parse().unwrap(),
        original: "https://example.com/original.jpg".parse().unwrap(),
    }
}

pub(crate) fn video(id: u32, duration: f64, server_resume_point: Option<f64>) -> VideoRecord {
    let mut urls = BTreeMap::new();
    urls.insert(
        Quality::High,
        format!("https://example.com/{id}.mp4").parse().unwrap(),
    );
    VideoRecord {
        id,
        name: format!("Video {id}"),
        description: String::new(),
        duration_seconds: duration,
        server_resume_point,
        premium: false,
        published_on: base_date(),
        images: images(),
        urls,
    }
}

pub(crate) fn unavailable(id: u32) -> VideoRecord {
    VideoRecord {
        urls: BTreeMap::new(),
        ..video(id, 100.0, None)
    }
}

pub(crate) fn show(id: u32, position: i32) -> ShowRecord {
    ShowRecord {
        id,
        title: format!("Show {id}"),
        description: String::new(),
        position,
        is_active: true,
        is_visible_in_nav: true,
        images: images(),
        latest_video: None,
    }
}

/// Saved `hours` after a fixed base date; larger is more recent.
pub(crate) fn progress(video_id: u32, hours: i64, saved_time: f64) -> SavedProgressRecord {
    SavedProgressRecord {
        video_id,
        saved_at: base_date() + Duration::hours(hours),
        saved_time,
    }
}

pub(crate) fn live() -> LiveStream {
    LiveStream {
        title: "Live now".into(),
        image: "https://example.com/live.png".parse().unwrap(),
        stream: "https://example.com/live.m3u8".parse().unwrap(),
    }
}

fn failure() -> NetworkError {
    giantbomb::Error::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
}

/// In-memory [`CatalogSource`] that counts the calls it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    list: Vec<VideoRecord>,
    filtered: Vec<(VideoFilter, Vec<VideoRecord>)>,
    by_id: HashMap<u32, VideoRecord>,
    shows: Vec<ShowRecord>,
    saved: Vec<SavedProgressRecord>,
    search: SearchPage,
    live: Option<LiveStream>,
    failing: bool,
    failing_details: bool,
    save_gate: Option<Arc<Notify>>,
    detail_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl FakeSource {
    /// Returned by unfiltered video listings.
    pub(crate) fn with_list(mut self, list: Vec<VideoRecord>) -> Self {
        self.list = list;
        self
    }

    pub(crate) fn with_filtered(mut self, filter: VideoFilter, list: Vec<VideoRecord>) -> Self {
        self.filtered.push((filter, list));
        self
    }

    /// Served by single video lookups.
    pub(crate) fn with_videos(mut self, videos: Vec<VideoRecord>) -> Self {
        self.by_id = videos.into_iter().map(|v| (v.id, v)).collect();
        self
    }

    pub(crate) fn with_shows(mut self, shows: Vec<ShowRecord>) -> Self {
        self.shows = shows;
        self
    }

    pub(crate) fn with_saved(mut self, saved: Vec<SavedProgressRecord>) -> Self {
        self.saved = saved;
        self
    }

    pub(crate) fn with_search(mut self, results: Vec<VideoRecord>, total_count: u32) -> Self {
        self.search = SearchPage {
            results,
            total_count,
        };
        self
    }

    pub(crate) fn with_live(mut self, live: LiveStream) -> Self {
        self.live = Some(live);
        self
    }

    /// Every request fails.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Only single video lookups fail.
    pub(crate) fn failing_details(mut self) -> Self {
        self.failing_details = true;
        self
    }

    /// Saves wait for `gate` to be notified before completing.
    pub(crate) fn with_save_gate(mut self, gate: Arc<Notify>) -> Self {
        self.save_gate = Some(gate);
        self
    }

    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> NetworkResult<()> {
        if self.failing {
            Err(failure())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch_video_list(
        &self,
        filter: Option<VideoFilter>,
        limit: Option<u32>,
        offset: u32,
    ) -> NetworkResult<Vec<VideoRecord>> {
        self.check()?;
        let list = match filter {
            None => &self.list,
            Some(filter) => self
                .filtered
                .iter()
                .find(|(f, _)| *f == filter)
                .map_or(&self.list, |(_, list)| list),
        };
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(list
            .iter()
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_show_list(&self) -> NetworkResult<Vec<ShowRecord>> {
        self.check()?;
        Ok(self.shows.clone())
    }

    async fn fetch_video_by_id(&self, id: u32) -> NetworkResult<VideoRecord> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if self.failing_details {
            return Err(failure());
        }
        self.by_id
            .get(&id)
            .cloned()
            .ok_or(giantbomb::Error::NotFound)
    }

    async fn fetch_saved_progress(&self) -> NetworkResult<Vec<SavedProgressRecord>> {
        self.check()?;
        Ok(self.saved.clone())
    }

    async fn post_save_time(&self, _video_id: u32, _position: f64) -> NetworkResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.save_gate {
            gate.notified().await;
        }
        self.check()
    }

    async fn post_mark_watched(&self, _video_id: u32) -> NetworkResult<()> {
        self.check()
    }

    async fn search(&self, _query: &str, _page: u32) -> NetworkResult<SearchPage> {
        self.check()?;
        Ok(self.search.clone())
    }

    async fn fetch_live_video(&self) -> NetworkResult<Option<LiveStream>> {
        self.check()?;
        Ok(self.live.clone())
    }
}
