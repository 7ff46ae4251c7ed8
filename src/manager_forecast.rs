use std::fmt;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// How forecast samples are bucketed into days
///
/// `WeekdayName` can't tell the same weekday of two different weeks apart, so for feeds
/// spanning more than a week the later occurrence is dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum KeyMode {
    #[serde(rename = "date")]
    CalendarDate,
    #[default]
    #[serde(rename = "weekday")]
    WeekdayName,
}

impl KeyMode {
    /// Returns the day key for the given timestamp
    ///
    /// # Arguments
    ///
    /// * 'timestamp' - sample time in UTC
    pub fn day_key(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            KeyMode::CalendarDate => timestamp.format("%Y-%m-%d").to_string(),
            KeyMode::WeekdayName => timestamp.format("%A").to_string(),
        }
    }
}

/// One 3-hour slot from the upstream forecast feed
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub condition_text: String,
    pub condition_icon: Option<String>,
}

/// A forecast entry that lacked a required field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMissing(pub &'static str);

impl fmt::Display for FieldMissing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FieldMissing: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub day_key: String,
    pub temperature: f64,
    pub condition_text: String,
    pub condition_icon: Option<String>,
}

impl From<(String, &ForecastSample)> for DailySummary {
    fn from((day_key, sample): (String, &ForecastSample)) -> Self {
        Self {
            day_key,
            temperature: sample.temperature,
            condition_text: sample.condition_text.clone(),
            condition_icon: sample.condition_icon.clone(),
        }
    }
}

pub type ForecastResult = Vec<DailySummary>;

/// Collapses a chronological sequence of forecast samples into at most `max_days` daily
/// summaries, one per distinct day key.
///
/// Each summary is taken from the first sample seen for its day, later samples for the same
/// day are ignored. Samples are expected in non-decreasing time order and are not re-sorted.
/// Entries that failed to decode are skipped and don't count against `max_days`.
///
/// # Arguments
///
/// * 'samples' - decoded samples in feed order
/// * 'key_mode' - whether to bucket on calendar date or weekday name
/// * 'max_days' - upper bound on the number of summaries
pub fn aggregate<I>(samples: I, key_mode: KeyMode, max_days: usize) -> ForecastResult
where
    I: IntoIterator<Item = Result<ForecastSample, FieldMissing>>,
{
    let mut result: ForecastResult = Vec::new();

    for sample in samples {
        if result.len() >= max_days {
            break;
        }

        let sample = match sample {
            Ok(s) => s,
            Err(e) => {
                debug!("skipping forecast entry: {}", e);
                continue;
            }
        };

        let day_key = key_mode.day_key(&sample.timestamp);
        if result.iter().any(|d| d.day_key == day_key) {
            continue;
        }

        result.push(DailySummary::from((day_key, &sample)));
    }

    result
}
