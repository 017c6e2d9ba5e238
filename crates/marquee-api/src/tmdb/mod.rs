//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints used for browsing:
//! listings, search, details, release dates, watch providers, and videos.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverParams, MediaKind, SearchParams, TmdbCountryReleases, TmdbErrorResponse, TmdbGenre,
    TmdbGenreList, TmdbMediaDetails, TmdbMediaPage, TmdbMediaSummary, TmdbPerson, TmdbPersonPage,
    TmdbProvider, TmdbRegionProviders, TmdbReleaseDate, TmdbReleaseDates, TmdbVideo, TmdbVideos,
    TmdbWatchProviders,
};
