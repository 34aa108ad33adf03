use core::fmt;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::date::FILTER_FORMAT;

/// Shows the app links to directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyShow {
    QuickLooks,
}

impl KeyShow {
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            KeyShow::QuickLooks => 3,
        }
    }
}

/// Server-side restriction of a video listing, sent as the `filter` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoFilter {
    /// Published between both dates, inclusive.
    Date { start: NaiveDate, end: NaiveDate },
    KeyShow(KeyShow),
    Premium,
    Show(u32),
    VideoIds(Vec<u32>),
}

impl fmt::Display for VideoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoFilter::Date { start, end } => write!(
                f,
                "publish_date:{}|{}",
                start.format(FILTER_FORMAT),
                end.format(FILTER_FORMAT)
            ),
            VideoFilter::KeyShow(show) => write!(f, "video_show:{}", show.id()),
            VideoFilter::Premium => f.write_str("premium:true"),
            VideoFilter::Show(id) => write!(f, "video_show:{id}"),
            VideoFilter::VideoIds(ids) => write!(f, "id:{}", ids.iter().join("|")),
        }
    }
}
