use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::date;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Images {
    #[serde(rename = "small_url")]
    pub small: Url,
    #[serde(rename = "screen_url")]
    pub medium: Url,
    #[serde(rename = "original_url")]
    pub original: Url,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Video {
    pub id: u32,
    pub name: String,
    #[serde(rename = "deck", default)]
    pub description: String,
    pub length_seconds: f64,
    #[serde(rename = "image")]
    pub images: Images,
    #[serde(default)]
    pub premium: bool,
    #[serde(deserialize_with = "date::publish_date")]
    pub publish_date: NaiveDateTime,
    #[serde(default, deserialize_with = "date::floored_seconds")]
    pub saved_time: Option<f64>,
    #[serde(default)]
    pub low_url: Option<Url>,
    #[serde(default)]
    pub high_url: Option<Url>,
    #[serde(default)]
    pub hd_url: Option<Url>,
}

impl Video {
    pub const FIELDS: &'static str =
        "id,name,deck,length_seconds,image,premium,publish_date,saved_time,low_url,high_url,hd_url";
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Show {
    pub id: u32,
    pub title: String,
    #[serde(rename = "deck", default)]
    pub description: String,
    #[serde(rename = "image")]
    pub images: Images,
    #[serde(rename = "active", default)]
    pub is_active: bool,
    #[serde(rename = "display_nav", default)]
    pub is_visible_in_nav: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(rename = "latest", default)]
    pub latest_videos: Option<Vec<Video>>,
}

impl Show {
    pub const FIELDS: &'static str = "id,title,deck,image,active,display_nav,position,latest";
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedTime {
    pub video_id: u32,
    #[serde(rename = "savedOn", deserialize_with = "date::saved_on")]
    pub saved_on: NaiveDateTime,
    #[serde(deserialize_with = "date::seconds")]
    pub saved_time: f64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavedTimes {
    pub saved_times: Vec<SavedTime>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiveVideo {
    pub title: String,
    /// Sent without a scheme.
    #[serde(deserialize_with = "schemeless_url")]
    pub image: Url,
    pub stream: Url,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LiveResponse {
    #[serde(default)]
    pub video: Option<LiveVideo>,
}

fn schemeless_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Url::parse(&format!("https://{value}")).map_err(D::Error::custom)
}
