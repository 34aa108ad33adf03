use std::sync::{Arc, RwLock};

use ahash::HashMap;
use chrono::{DateTime, Utc};
use tracing::trace;

use crate::models::{SavedProgressRecord, ShowRecord, VideoRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResumeOverride {
    position: f64,
    recorded: DateTime<Utc>,
}

/// Session-wide store of fetched records and locally known resume points.
///
/// Clones share the same maps. Every operation is synchronous and takes its
/// lock only for the duration of the call, so a handle can be used freely
/// between `.await` points.
///
/// Resume points written through [`ResumeCache::set_resume_point`] take
/// precedence over the resume point carried by a fetched [`VideoRecord`].
/// Nothing is ever evicted.
#[derive(Debug, Clone, Default)]
pub struct ResumeCache {
    videos: Arc<RwLock<HashMap<u32, VideoRecord>>>,
    shows: Arc<RwLock<HashMap<u32, ShowRecord>>>,
    resume_overrides: Arc<RwLock<HashMap<u32, ResumeOverride>>>,
}

impl ResumeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_video(&self, video: VideoRecord) {
        self.videos
            .write()
            .expect("RWLock should never be poisoned")
            .insert(video.id, video);
    }

    pub fn store_show(&self, show: ShowRecord) {
        self.shows
            .write()
            .expect("RWLock should never be poisoned")
            .insert(show.id, show);
    }

    #[must_use]
    pub fn lookup_video(&self, id: u32) -> Option<VideoRecord> {
        let video = self
            .videos
            .read()
            .expect("RWLock should never be poisoned")
            .get(&id)
            .cloned()?;
        trace!(id, name = video.name, "retrieved video from cache");
        Some(video)
    }

    #[must_use]
    pub fn lookup_show(&self, id: u32) -> Option<ShowRecord> {
        self.shows
            .read()
            .expect("RWLock should never be poisoned")
            .get(&id)
            .cloned()
    }

    /// The local override for `video` if one exists, else the server's value.
    #[must_use]
    pub fn resume_point(&self, video: &VideoRecord) -> Option<f64> {
        self.resume_override(video.id)
            .or(video.server_resume_point)
    }

    /// Only the locally recorded resume point for `id`.
    #[must_use]
    pub fn resume_override(&self, id: u32) -> Option<f64> {
        self.resume_overrides
            .read()
            .expect("RWLock should never be poisoned")
            .get(&id)
            .map(|o| o.position)
    }

    pub fn set_resume_point(&self, id: u32, position: f64) {
        self.insert_override(id, position, Utc::now());
    }

    pub fn record_watch_progress(&self, progress: &SavedProgressRecord) {
        self.set_resume_point(progress.video_id, progress.saved_time);
    }

    /// Imports `progress` unless an override for the same video was recorded
    /// after `issued`, the moment the request carrying `progress` was sent.
    ///
    /// Returns whether the import was applied.
    pub fn record_watch_progress_since(
        &self,
        progress: &SavedProgressRecord,
        issued: DateTime<Utc>,
    ) -> bool {
        let mut map = self
            .resume_overrides
            .write()
            .expect("RWLock should never be poisoned");
        if let Some(existing) = map.get(&progress.video_id) {
            if existing.recorded > issued {
                trace!(
                    id = progress.video_id,
                    "kept local resume point newer than the server listing"
                );
                return false;
            }
        }
        map.insert(
            progress.video_id,
            ResumeOverride {
                position: progress.saved_time,
                recorded: issued,
            },
        );
        true
    }

    fn insert_override(&self, id: u32, position: f64, recorded: DateTime<Utc>) {
        self.resume_overrides
            .write()
            .expect("RWLock should never be poisoned")
            .insert(id, ResumeOverride { position, recorded });
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::testing::{progress, show, video};

    #[test]
    fn test_store_and_lookup_video() {
        let cache = ResumeCache::new();
        assert!(cache.lookup_video(1).is_none());
        cache.store_video(video(1, 100.0, None));
        assert_eq!(cache.lookup_video(1).unwrap().id, 1);
    }

    #[test]
    fn test_store_video_last_write_wins() {
        let cache = ResumeCache::new();
        cache.store_video(video(1, 100.0, Some(10.0)));
        cache.store_video(video(1, 200.0, Some(20.0)));
        let cached = cache.lookup_video(1).unwrap();
        assert_eq!(cached.duration_seconds, 200.0);
        assert_eq!(cached.server_resume_point, Some(20.0));
    }

    #[test]
    fn test_store_video_does_not_touch_overrides() {
        let cache = ResumeCache::new();
        cache.store_video(video(1, 100.0, Some(10.0)));
        assert_eq!(cache.resume_override(1), None);
    }

    #[test]
    fn test_store_and_lookup_show() {
        let cache = ResumeCache::new();
        cache.store_show(show(7, 1));
        assert_eq!(cache.lookup_show(7).unwrap().position, 1);
        assert!(cache.lookup_show(8).is_none());
    }

    #[test]
    fn test_resume_point_falls_back_to_server() {
        let cache = ResumeCache::new();
        assert_eq!(cache.resume_point(&video(1, 100.0, Some(33.0))), Some(33.0));
        assert_eq!(cache.resume_point(&video(1, 100.0, None)), None);
    }

    #[test]
    fn test_override_takes_precedence() {
        let cache = ResumeCache::new();
        cache.set_resume_point(1, 50.0);
        assert_eq!(cache.resume_point(&video(1, 100.0, Some(33.0))), Some(50.0));
        assert_eq!(cache.resume_point(&video(1, 100.0, None)), Some(50.0));
        assert_eq!(cache.resume_point(&video(2, 100.0, Some(33.0))), Some(33.0));
    }

    #[test]
    fn test_set_resume_point_is_idempotent() {
        let cache = ResumeCache::new();
        let v = video(1, 100.0, Some(5.0));
        cache.set_resume_point(1, 42.0);
        cache.set_resume_point(1, 42.0);
        assert_eq!(cache.resume_point(&v), Some(42.0));
    }

    #[test]
    fn test_record_watch_progress() {
        let cache = ResumeCache::new();
        cache.record_watch_progress(&progress(3, 0, 61.0));
        assert_eq!(cache.resume_override(3), Some(61.0));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = ResumeCache::new();
        let other = cache.clone();
        other.set_resume_point(1, 12.0);
        other.store_video(video(1, 100.0, None));
        assert_eq!(cache.resume_override(1), Some(12.0));
        assert!(cache.lookup_video(1).is_some());
    }

    #[test]
    fn test_import_does_not_clobber_newer_local_save() {
        let cache = ResumeCache::new();
        let issued = Utc::now() - Duration::seconds(5);
        cache.set_resume_point(1, 120.0);
        assert!(!cache.record_watch_progress_since(&progress(1, 0, 30.0), issued));
        assert_eq!(cache.resume_override(1), Some(120.0));
    }

    #[test]
    fn test_import_replaces_older_local_save() {
        let cache = ResumeCache::new();
        cache.set_resume_point(1, 120.0);
        let issued = Utc::now() + Duration::seconds(5);
        assert!(cache.record_watch_progress_since(&progress(1, 0, 30.0), issued));
        assert_eq!(cache.resume_override(1), Some(30.0));
    }
}
