//! Paged browsing: popular listings, actor filmographies, and title search.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use marquee_api::tmdb::{
    DiscoverParams, LocalTmdbApi, MediaKind, SearchParams, TmdbMediaPage, TmdbMediaSummary,
};
use tracing::instrument;

/// Maximum number of results kept per listing page.
pub const PAGE_SIZE: usize = 12;

/// Queries shorter than this (in characters) are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// What the current listing shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseMode {
    /// Trending titles, or a genre's discover listing.
    Popular,
    /// Titles featuring a person.
    Actor {
        /// TMDB person id.
        id: u64,
        /// Display name of the matched person.
        name: String,
    },
    /// Title search.
    Search(String),
}

/// Browsing state over one TMDB client.
#[derive(Debug)]
pub struct BrowseSession<'a, A> {
    api: &'a A,
    kind: MediaKind,
    genre: Option<u32>,
    language: String,
    mode: BrowseMode,
    page: u32,
    total_pages: u32,
    results: Vec<TmdbMediaSummary>,
}

impl<'a, A: LocalTmdbApi> BrowseSession<'a, A> {
    /// Creates an empty session in popular mode on page 1.
    pub fn new(api: &'a A, kind: MediaKind, language: impl Into<String>) -> Self {
        Self {
            api,
            kind,
            genre: None,
            language: language.into(),
            mode: BrowseMode::Popular,
            page: 1,
            total_pages: 1,
            results: Vec::new(),
        }
    }

    /// Current mode.
    pub const fn mode(&self) -> &BrowseMode {
        &self.mode
    }

    /// Selected media kind.
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Selected genre filter.
    pub const fn genre(&self) -> Option<u32> {
        self.genre
    }

    /// Current page (1-based).
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported for the current listing.
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Results of the current page, at most [`PAGE_SIZE`].
    pub fn results(&self) -> &[TmdbMediaSummary] {
        &self.results
    }

    /// Switches the media kind. Genre ids differ per kind, so the filter is cleared.
    pub fn set_kind(&mut self, kind: MediaKind) {
        if self.kind != kind {
            self.kind = kind;
            self.genre = None;
        }
    }

    /// Sets or clears the genre filter.
    pub const fn set_genre(&mut self, genre: Option<u32>) {
        self.genre = genre;
    }

    /// Lists popular titles at `page`.
    ///
    /// With a genre selected this is a discover listing, otherwise the
    /// weekly trending list.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    #[instrument(skip_all, fields(kind = %self.kind, page = page))]
    pub async fn load_popular(&mut self, page: u32) -> Result<()> {
        self.mode = BrowseMode::Popular;
        self.page = page.max(1);
        self.refresh().await
    }

    /// Lists titles featuring the first person matching `name`.
    ///
    /// Names shorter than [`MIN_QUERY_CHARS`] fall back to popular page 1.
    /// When nobody matches the listing is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the person search or the listing request fails.
    #[instrument(skip_all, fields(kind = %self.kind))]
    pub async fn search_actor(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.chars().count() < MIN_QUERY_CHARS {
            tracing::debug!("actor query too short, showing popular titles");
            return self.load_popular(1).await;
        }

        let people = self
            .api
            .search_person(name)
            .await
            .with_context(|| format!("failed to search people named {name}"))?;

        let Some(person) = people.results.into_iter().next() else {
            tracing::info!(query = name, "no matching actor");
            self.clear();
            return Ok(());
        };

        tracing::debug!(person_id = person.id, person = %person.name, "actor matched");
        self.mode = BrowseMode::Actor {
            id: person.id,
            name: person.name,
        };
        self.page = 1;
        self.refresh().await
    }

    /// Searches titles of the selected kind and genre.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] yield an empty listing
    /// without a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip_all, fields(kind = %self.kind))]
    pub async fn search(&mut self, query: &str) -> Result<()> {
        self.mode = BrowseMode::Search(query.trim().to_owned());
        self.page = 1;
        self.refresh().await
    }

    /// Moves to the next page if there is one.
    ///
    /// Returns whether the page changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn next_page(&mut self) -> Result<bool> {
        if self.page >= self.total_pages {
            return Ok(false);
        }
        self.page += 1;
        self.refresh().await?;
        Ok(true)
    }

    /// Moves to the previous page if there is one.
    ///
    /// Returns whether the page changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn prev_page(&mut self) -> Result<bool> {
        if self.page <= 1 {
            return Ok(false);
        }
        self.page -= 1;
        self.refresh().await?;
        Ok(true)
    }

    /// Jumps to `page` if it lies within the current listing.
    ///
    /// Returns whether the page changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn go_to_page(&mut self, page: u32) -> Result<bool> {
        if page == self.page || page < 1 || page > self.total_pages {
            return Ok(false);
        }
        self.page = page;
        self.refresh().await?;
        Ok(true)
    }

    /// Re-fetches the current page of the current mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    pub async fn refresh(&mut self) -> Result<()> {
        let page = match &self.mode {
            BrowseMode::Popular => match self.genre {
                Some(genre) => self
                    .api
                    .discover(self.kind, &self.discover_params().with_genres(Some(genre)))
                    .await
                    .context("failed to fetch genre listing")?,
                None => self
                    .api
                    .trending(self.kind, self.page, &self.language)
                    .await
                    .context("failed to fetch trending listing")?,
            },
            BrowseMode::Actor { id, .. } => self
                .api
                .discover(self.kind, &self.discover_params().with_cast(*id))
                .await
                .with_context(|| format!("failed to fetch titles for person {id}"))?,
            BrowseMode::Search(query) => {
                if query.chars().count() < MIN_QUERY_CHARS {
                    tracing::debug!("search query too short");
                    self.clear();
                    return Ok(());
                }
                let params = SearchParams::new(query.as_str())
                    .language(self.language.as_str())
                    .page(self.page)
                    .with_genres(self.genre);
                self.api
                    .search(self.kind, &params)
                    .await
                    .with_context(|| format!("failed to search for {query}"))?
            }
        };
        self.apply(page);
        Ok(())
    }

    fn discover_params(&self) -> DiscoverParams {
        DiscoverParams::default()
            .language(self.language.as_str())
            .page(self.page)
    }

    fn apply(&mut self, page: TmdbMediaPage) {
        if page.total_results == 0 {
            self.clear();
            return;
        }
        self.results = page.results;
        self.results.truncate(PAGE_SIZE);
        self.total_pages = page.total_pages.max(1);
        tracing::debug!(
            page = self.page,
            total_pages = self.total_pages,
            results = self.results.len(),
            "listing updated"
        );
    }

    fn clear(&mut self) {
        self.results.clear();
        self.page = 1;
        self.total_pages = 1;
    }
}
