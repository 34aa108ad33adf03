use chrono::{Datelike, Days, Months, NaiveDate};
use giantbomb::{KeyShow, VideoFilter};
use tracing::{debug, instrument};

use crate::catalog::CatalogClient;
use crate::errors::{Error, Result};
use crate::models::{LiveStream, ShowRecord, VideoRecord};
use crate::resume::ResumeTimeProvider;
use crate::source::CatalogSource;

/// Anything a home screen row can show.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum HomeItem {
    Video(VideoRecord),
    Show(ShowRecord),
    LiveStream(LiveStream),
}

impl HomeItem {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            HomeItem::Video(video) => &video.name,
            HomeItem::Show(show) => &show.title,
            HomeItem::LiveStream(live) => &live.title,
        }
    }

    #[must_use]
    pub fn progress(&self, provider: &impl ResumeTimeProvider) -> Option<f64> {
        match self {
            HomeItem::Video(video) => provider.progress(video),
            HomeItem::Show(_) | HomeItem::LiveStream(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Highlight {
    LiveStream(LiveStream),
    ResumeWatching(VideoRecord),
    Latest(VideoRecord),
}

impl Highlight {
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Highlight::LiveStream(live) => format!("Live now: {}", live.title),
            Highlight::ResumeWatching(video) => format!("Continue watching {}", video.name),
            Highlight::Latest(video) => format!("Recently added: {}", video.name),
        }
    }

    #[must_use]
    pub fn item(&self) -> HomeItem {
        match self {
            Highlight::LiveStream(live) => HomeItem::LiveStream(live.clone()),
            Highlight::ResumeWatching(video) | Highlight::Latest(video) => {
                HomeItem::Video(video.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HomeSection {
    Highlights(Vec<Highlight>),
    Row {
        title: &'static str,
        items: Vec<HomeItem>,
    },
}

impl HomeSection {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            HomeSection::Highlights(_) => "Highlights",
            HomeSection::Row { title, .. } => title,
        }
    }

    fn videos(title: &'static str, videos: Vec<VideoRecord>) -> Self {
        HomeSection::Row {
            title,
            items: videos.into_iter().map(HomeItem::Video).collect(),
        }
    }
}

/// First and last day of the week that started ten years before the week of `today`.
#[must_use]
pub fn ten_years_ago(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week_start = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
    let start = week_start
        .checked_sub_months(Months::new(120))
        .unwrap_or(week_start);
    (start, start + Days::new(6))
}

async fn live_highlight<S>(client: &CatalogClient<S>) -> Option<Highlight>
where
    S: CatalogSource + 'static,
{
    match client.live_video().await {
        Ok(live) => Some(Highlight::LiveStream(live)),
        Err(Error::NoLiveVideo) => None,
        Err(err) => {
            debug!("skipping live highlight: {err}");
            None
        }
    }
}

/// Builds every home screen section, fetching them concurrently.
///
/// # Errors
/// [`Error::Network`]: If any listing other than the live stream fails.
#[instrument(skip(client))]
pub async fn build<S>(
    client: &CatalogClient<S>,
    today: NaiveDate,
    recently_watched_limit: usize,
) -> Result<Vec<HomeSection>>
where
    S: CatalogSource + 'static,
{
    let (start, end) = ten_years_ago(today);
    let (live, newest, latest, shows, recently_watched, quick_looks, ten_years) = tokio::join!(
        live_highlight(client),
        client.fetch_videos(None, Some(1), 0),
        client.fetch_videos(None, None, 0),
        client.fetch_shows(),
        client.fetch_recently_watched(recently_watched_limit),
        client.fetch_videos(Some(VideoFilter::KeyShow(KeyShow::QuickLooks)), None, 0),
        client.fetch_videos(Some(VideoFilter::Date { start, end }), None, 0),
    );
    let (newest, latest, mut shows, recently_watched, quick_looks, ten_years) = (
        newest?,
        latest?,
        shows?,
        recently_watched?,
        quick_looks?,
        ten_years?,
    );

    shows.retain(ShowRecord::is_promoted);
    shows.sort_by_key(|s| s.position);

    let highlights = live
        .into_iter()
        .chain(
            recently_watched
                .iter()
                .cloned()
                .map(Highlight::ResumeWatching),
        )
        .chain(newest.into_iter().map(Highlight::Latest))
        .collect();

    Ok(vec![
        HomeSection::Highlights(highlights),
        HomeSection::videos("Latest", latest),
        HomeSection::Row {
            title: "Shows",
            items: shows.into_iter().map(HomeItem::Show).collect(),
        },
        HomeSection::videos("Continue watching", recently_watched),
        HomeSection::videos("Quick Looks", quick_looks),
        HomeSection::videos("Ten years ago…", ten_years),
    ])
}
