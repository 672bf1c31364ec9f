// src/source/http.rs
// Endpoint sources: a single `?days=N` query, or per-day `_cat/indices` lookups

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tracing::info;
use url::Url;

use super::DataSource;
use crate::error::Result;
use crate::http::{FetchSettings, Fetcher};
use crate::model::{self, IndexInfo};

/// Columns requested from `_cat/indices`, with sizes in raw bytes
pub const CAT_QUERY: &str = "v&h=index,pri,rep,docs.count,store.size&format=json&bytes=b";

/// One GET to `<endpoint>?days=N`
pub struct HttpSource {
    url: Url,
    settings: FetchSettings,
}

impl HttpSource {
    pub fn new(endpoint: Url, days: u32, settings: FetchSettings) -> Self {
        let mut url = endpoint;
        url.query_pairs_mut()
            .append_pair("days", &days.to_string());
        Self { url, settings }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn load(&self) -> Result<Vec<IndexInfo>> {
        let fetcher = Fetcher::new(&self.settings);
        let body = fetcher.get(&self.url).await?;
        model::decode_payload(&body, self.url.as_str())
    }
}

/// One `_cat/indices/*YYYY*MM*DD` GET per day, newest first
pub struct CatSource {
    endpoint: Url,
    days: u32,
    today: NaiveDate,
    settings: FetchSettings,
}

impl CatSource {
    pub fn new(endpoint: Url, days: u32, today: NaiveDate, settings: FetchSettings) -> Self {
        Self {
            endpoint,
            days,
            today,
            settings,
        }
    }

    /// Per-day URLs, newest first, built as they are consumed.
    ///
    /// Stops early once the window runs past the earliest representable date.
    fn day_urls(&self) -> impl Iterator<Item = Url> + '_ {
        (0..self.days)
            .map_while(|back| self.today.checked_sub_days(Days::new(u64::from(back))))
            .map(|day| self.day_url(day))
    }

    fn day_url(&self, day: NaiveDate) -> Url {
        let mut url = self.endpoint.clone();
        let pattern = day.format("*%Y*%m*%d").to_string();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["_cat", "indices", pattern.as_str()]);
        }
        url.set_query(Some(CAT_QUERY));
        url
    }
}

#[async_trait]
impl DataSource for CatSource {
    fn describe(&self) -> String {
        format!("{} _cat/indices over {} days", self.endpoint, self.days)
    }

    async fn load(&self) -> Result<Vec<IndexInfo>> {
        let fetcher = Fetcher::new(&self.settings);
        let mut indexes = Vec::new();

        for url in self.day_urls() {
            let body = fetcher.get(&url).await?;
            let rows = model::decode_array(&body, url.as_str())?;
            info!(url = %url, count = rows.len(), "fetched daily indexes");
            indexes.extend(rows);
        }

        model::validate_dataset(indexes, &self.describe())
    }
}
