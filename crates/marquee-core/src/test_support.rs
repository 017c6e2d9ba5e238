//! Shared test doubles.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use anyhow::{Result, bail};
use marquee_api::tmdb::{
    DiscoverParams, LocalTmdbApi, MediaKind, SearchParams, TmdbGenreList, TmdbMediaDetails,
    TmdbMediaPage, TmdbMediaSummary, TmdbPersonPage, TmdbReleaseDates, TmdbVideos,
    TmdbWatchProviders,
};

/// Canned-response TMDB API; `None` endpoints fail.
#[derive(Debug, Default)]
pub struct MockTmdbApi {
    pub genres: Option<TmdbGenreList>,
    pub trending: Option<TmdbMediaPage>,
    pub discover: Option<TmdbMediaPage>,
    pub search: Option<TmdbMediaPage>,
    pub search_multi: Option<TmdbMediaPage>,
    pub search_person: Option<TmdbPersonPage>,
    pub details: Option<TmdbMediaDetails>,
    pub release_dates: Option<TmdbReleaseDates>,
    pub watch_providers: Option<TmdbWatchProviders>,
    pub videos: Option<TmdbVideos>,
    /// Endpoint calls in order, e.g. `discover movie page=2 cast=6384`.
    pub calls: Mutex<Vec<String>>,
}

impl MockTmdbApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn canned<T: Clone>(value: Option<&T>, endpoint: &str) -> Result<T> {
    match value {
        Some(v) => Ok(v.clone()),
        None => bail!("{endpoint} failed"),
    }
}

impl LocalTmdbApi for MockTmdbApi {
    async fn genres(&self, kind: MediaKind, _language: &str) -> Result<TmdbGenreList> {
        self.record(format!("genres {kind}"));
        canned(self.genres.as_ref(), "genres")
    }

    async fn trending(&self, kind: MediaKind, page: u32, _language: &str) -> Result<TmdbMediaPage> {
        self.record(format!("trending {kind} page={page}"));
        canned(self.trending.as_ref(), "trending")
    }

    async fn discover(&self, kind: MediaKind, params: &DiscoverParams) -> Result<TmdbMediaPage> {
        let mut call = format!("discover {kind} page={}", params.page);
        if let Some(genre) = params.with_genres {
            call.push_str(&format!(" genre={genre}"));
        }
        if let Some(cast) = params.with_cast {
            call.push_str(&format!(" cast={cast}"));
        }
        self.record(call);
        canned(self.discover.as_ref(), "discover")
    }

    async fn search(&self, kind: MediaKind, params: &SearchParams) -> Result<TmdbMediaPage> {
        self.record(format!(
            "search {kind} query={} page={}",
            params.query, params.page
        ));
        canned(self.search.as_ref(), "search")
    }

    async fn search_multi(&self, query: &str) -> Result<TmdbMediaPage> {
        self.record(format!("search_multi query={query}"));
        canned(self.search_multi.as_ref(), "search_multi")
    }

    async fn search_person(&self, query: &str) -> Result<TmdbPersonPage> {
        self.record(format!("search_person query={query}"));
        canned(self.search_person.as_ref(), "search_person")
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<TmdbMediaDetails> {
        self.record(format!("details {kind} {id}"));
        canned(self.details.as_ref(), "details")
    }

    async fn release_dates(&self, kind: MediaKind, id: u64) -> Result<TmdbReleaseDates> {
        self.record(format!("release_dates {kind} {id}"));
        canned(self.release_dates.as_ref(), "release_dates")
    }

    async fn watch_providers(&self, kind: MediaKind, id: u64) -> Result<TmdbWatchProviders> {
        self.record(format!("watch_providers {kind} {id}"));
        canned(self.watch_providers.as_ref(), "watch_providers")
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<TmdbVideos> {
        self.record(format!("videos {kind} {id}"));
        canned(self.videos.as_ref(), "videos")
    }
}

/// Builds a listing page from summaries.
pub fn page_of(results: Vec<TmdbMediaSummary>, total_pages: u32) -> TmdbMediaPage {
    let total_results = u32::try_from(results.len()).unwrap();
    TmdbMediaPage {
        page: 1,
        results,
        total_pages,
        total_results,
    }
}

/// Movie summary with an id and title.
pub fn movie(id: u64, title: &str) -> TmdbMediaSummary {
    TmdbMediaSummary {
        id,
        title: Some(String::from(title)),
        ..TmdbMediaSummary::default()
    }
}

/// Parses a fixture file under `fixtures/tmdb/`.
macro_rules! fixture {
    ($name:literal) => {
        serde_json::from_str(include_str!(concat!("../../../fixtures/tmdb/", $name))).unwrap()
    };
}

pub(crate) use fixture;
