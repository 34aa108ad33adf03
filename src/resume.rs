use crate::cache::ResumeCache;
use crate::models::{ShowRecord, VideoRecord};

/// The closing seconds of every video, counted as already finished.
pub const CREDITS_WINDOW_SECONDS: f64 = 10.0;

/// Playback state of a video as the UI presents it.
///
/// Only [`ResumeTimeProvider::resume_point`] is required; the derived states
/// are mutually exclusive for any resume point.
pub trait ResumeTimeProvider {
    fn resume_point(&self, video: &VideoRecord) -> Option<f64>;

    /// Watched into the credits window.
    fn is_completed(&self, video: &VideoRecord) -> bool {
        self.resume_point(video)
            .is_some_and(|point| point > video.duration_seconds - CREDITS_WINDOW_SECONDS)
    }

    /// Started, but stopped before the credits window.
    fn is_resumable(&self, video: &VideoRecord) -> bool {
        self.resume_point(video).is_some_and(|point| {
            point > 0.0 && point < video.duration_seconds - CREDITS_WINDOW_SECONDS
        })
    }

    /// Fraction watched, only for resumable videos.
    fn progress(&self, video: &VideoRecord) -> Option<f64> {
        if !self.is_resumable(video) {
            return None;
        }
        self.resume_point(video)
            .map(|point| point / video.duration_seconds)
    }
}

pub trait ShowProvider {
    fn show(&self, id: u32) -> Option<ShowRecord>;
}

impl ResumeTimeProvider for ResumeCache {
    fn resume_point(&self, video: &VideoRecord) -> Option<f64> {
        ResumeCache::resume_point(self, video)
    }
}

impl ShowProvider for ResumeCache {
    fn show(&self, id: u32) -> Option<ShowRecord> {
        self.lookup_show(id)
    }
}
