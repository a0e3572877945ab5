//! Market data feeds

pub mod mboum;

pub use mboum::MboumClient;

use crate::record::RawRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which upstream feed a record came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedType {
    UnusualActivity,
    OptionsFlow,
}

impl FeedType {
    pub const ALL: [FeedType; 2] = [FeedType::UnusualActivity, FeedType::OptionsFlow];

    pub fn name(&self) -> &'static str {
        match self {
            FeedType::UnusualActivity => "unusual options",
            FeedType::OptionsFlow => "options flow",
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of raw records.
///
/// Implementations absorb their own transport and parse failures; callers
/// only ever see an empty page.
#[async_trait]
pub trait MarketDataFeed: Send + Sync {
    async fn fetch_records(&self, feed: FeedType, page: u32) -> Vec<RawRecord>;
    fn name(&self) -> &str;
}

/// Records from a response body: a bare array, or an object whose `body`
/// is an array. Non-object entries are dropped.
pub fn extract_records(body: Value) -> Vec<RawRecord> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("body") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items.into_iter().filter_map(RawRecord::from_value).collect()
}
