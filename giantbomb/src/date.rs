use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

pub(crate) const PUBLISH_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const SAVED_ON_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
pub(crate) const FILTER_FORMAT: &str = "%Y-%m-%d";

/// The API sends seconds either as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(f64),
    Text(String),
}

impl Seconds {
    // Unparseable text counts as "not started" rather than failing the whole payload.
    fn get(self) -> f64 {
        match self {
            Seconds::Number(n) => n,
            Seconds::Text(s) => s.trim().parse().unwrap_or_default(),
        }
    }
}

fn parse<'de, D>(deserializer: D, format: &str) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&value, format)
        .map_err(|e| D::Error::custom(format_args!("invalid date {value:?}: {e}")))
}

pub(crate) fn publish_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    parse(deserializer, PUBLISH_FORMAT)
}

pub(crate) fn saved_on<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    parse(deserializer, SAVED_ON_FORMAT)
}

pub(crate) fn seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Seconds::deserialize(deserializer)?.get())
}

/// Saved time attached to a video. Whole seconds only.
pub(crate) fn floored_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = Option::<Seconds>::deserialize(deserializer)?;
    Ok(seconds.map(|s| s.get().floor()))
}
