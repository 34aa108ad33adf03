use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use url::Url;

use giantbomb::models as api;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Images {
    pub small: Url,
    pub medium: Url,
    pub original: Url,
}

impl From<api::Images> for Images {
    fn from(images: api::Images) -> Self {
        Self {
            small: images.small,
            medium: images.medium,
            original: images.original,
        }
    }
}

/// Playback qualities, ordered from lowest to highest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quality {
    Low,
    High,
    Hd,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoRecord {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub duration_seconds: f64,
    /// Resume point as of the fetch that produced this record.
    pub server_resume_point: Option<f64>,
    pub premium: bool,
    pub published_on: NaiveDateTime,
    pub images: Images,
    pub urls: BTreeMap<Quality, Url>,
}

impl VideoRecord {
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.urls.is_empty()
    }

    /// The url for `quality`, falling back to the best lower quality.
    #[must_use]
    pub fn best_url(&self, quality: Quality) -> Option<&Url> {
        self.urls.range(..=quality).next_back().map(|(_, url)| url)
    }
}

impl From<api::Video> for VideoRecord {
    fn from(video: api::Video) -> Self {
        let urls = [
            (Quality::Low, video.low_url),
            (Quality::High, video.high_url),
            (Quality::Hd, video.hd_url),
        ]
        .into_iter()
        .filter_map(|(quality, url)| url.map(|u| (quality, u)))
        .collect();

        Self {
            id: video.id,
            name: video.name,
            description: video.description,
            duration_seconds: video.length_seconds.max(0.0),
            server_resume_point: video.saved_time,
            premium: video.premium,
            published_on: video.publish_date,
            images: video.images.into(),
            urls,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShowRecord {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Ordering hint for navigation.
    pub position: i32,
    pub is_active: bool,
    pub is_visible_in_nav: bool,
    pub images: Images,
    pub latest_video: Option<VideoRecord>,
}

impl ShowRecord {
    #[must_use]
    pub fn is_promoted(&self) -> bool {
        self.is_active && self.is_visible_in_nav
    }
}

impl From<api::Show> for ShowRecord {
    fn from(show: api::Show) -> Self {
        Self {
            id: show.id,
            title: show.title,
            description: show.description,
            position: show.position,
            is_active: show.is_active,
            is_visible_in_nav: show.is_visible_in_nav,
            images: show.images.into(),
            latest_video: show
                .latest_videos
                .and_then(|v| v.into_iter().next())
                .map(VideoRecord::from),
        }
    }
}

/// A saved position reported by the server's recently watched listing.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedProgressRecord {
    pub video_id: u32,
    pub saved_at: NaiveDateTime,
    pub saved_time: f64,
}

impl From<api::SavedTime> for SavedProgressRecord {
    fn from(saved: api::SavedTime) -> Self {
        Self {
            video_id: saved.video_id,
            saved_at: saved.saved_on,
            saved_time: saved.saved_time,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiveStream {
    pub title: String,
    pub image: Url,
    pub stream: Url,
}

impl From<api::LiveVideo> for LiveStream {
    fn from(live: api::LiveVideo) -> Self {
        Self {
            title: live.title,
            image: live.image,
            stream: live.stream,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<VideoRecord>,
    pub total_count: u32,
}

impl From<giantbomb::Wrapped<Vec<api::Video>>> for SearchPage {
    fn from(wrapped: giantbomb::Wrapped<Vec<api::Video>>) -> Self {
        Self {
            results: wrapped.results.into_iter().map(VideoRecord::from).collect(),
            total_count: wrapped.total_results,
        }
    }
}
