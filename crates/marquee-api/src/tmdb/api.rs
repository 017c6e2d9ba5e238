//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    DiscoverParams, MediaKind, SearchParams, TmdbGenreList, TmdbMediaDetails, TmdbMediaPage,
    TmdbPersonPage, TmdbReleaseDates, TmdbVideos, TmdbWatchProviders,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the genre list for a media kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genres(&self, kind: MediaKind, language: &str) -> Result<TmdbGenreList>;

    /// Fetches the weekly trending listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, kind: MediaKind, page: u32, language: &str) -> Result<TmdbMediaPage>;

    /// Fetches a discover listing filtered by genre and/or cast.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover(&self, kind: MediaKind, params: &DiscoverParams) -> Result<TmdbMediaPage>;

    /// Searches movies or TV series by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, kind: MediaKind, params: &SearchParams) -> Result<TmdbMediaPage>;

    /// Searches movies, TV series, and people at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_multi(&self, query: &str) -> Result<TmdbMediaPage>;

    /// Searches people by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_person(&self, query: &str) -> Result<TmdbPersonPage>;

    /// Fetches full details of a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, kind: MediaKind, id: u64) -> Result<TmdbMediaDetails>;

    /// Fetches release dates grouped by country.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn release_dates(&self, kind: MediaKind, id: u64) -> Result<TmdbReleaseDates>;

    /// Fetches watch providers grouped by region.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn watch_providers(&self, kind: MediaKind, id: u64) -> Result<TmdbWatchProviders>;

    /// Fetches videos (trailers, teasers, clips).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<TmdbVideos>;
}
