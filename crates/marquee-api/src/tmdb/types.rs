//! TMDB API response types and request parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

// --- Media kind ---

/// Media kind addressed by TMDB path segments (`movie/...`, `tv/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
}

impl MediaKind {
    /// Returns the path segment used in endpoint URLs.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

// --- Genres ---

/// Response from `genre/{kind}/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    /// Genres for the requested media kind.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Listings (trending, discover, search) ---

/// Paged media listing returned by trending, discover, and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMediaPage {
    /// Current page number.
    pub page: u32,
    /// Listing entries.
    pub results: Vec<TmdbMediaSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single listing entry.
///
/// Movies carry `title`/`release_date`, TV series carry `name`/`first_air_date`.
/// Trending and multi-search responses also carry `media_type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMediaSummary {
    /// TMDB ID.
    pub id: u64,
    /// Media type (`movie`, `tv`, `person`); absent on kind-specific endpoints.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series (or person) name.
    #[serde(default)]
    pub name: Option<String>,
    /// Movie release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// TV first air date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMediaSummary {
    /// Returns the title for movies or the name for TV series.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Response from `search/person` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonPage {
    /// Current page number.
    pub page: u32,
    /// Matching people.
    pub results: Vec<TmdbPerson>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single person search result.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Department the person is known for (e.g., "Acting").
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
}

// --- Details ---

/// Response from `movie/{id}` or `tv/{id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMediaDetails {
    /// TMDB ID.
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Movie release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// TV first air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Movie runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Number of TV seasons.
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    /// Status (e.g., "Released", "Returning Series").
    #[serde(default)]
    pub status: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMediaDetails {
    /// Returns the title for movies or the name for TV series.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

// --- Release dates ---

/// Response from `{kind}/{id}/release_dates` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbReleaseDates {
    /// TMDB ID.
    #[serde(default)]
    pub id: u64,
    /// Release dates grouped by country.
    #[serde(default)]
    pub results: Vec<TmdbCountryReleases>,
}

/// Release dates for one country.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCountryReleases {
    /// Country code (ISO 3166-1).
    pub iso_3166_1: String,
    /// Release entries.
    pub release_dates: Vec<TmdbReleaseDate>,
}

/// A single release entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDate {
    /// Release type code (1 premiere .. 6 TV).
    #[serde(rename = "type")]
    pub release_type: u8,
    /// Release timestamp (e.g., "2024-02-27T00:00:00.000Z").
    pub release_date: String,
    /// Age certification.
    #[serde(default)]
    pub certification: Option<String>,
    /// Free-form note (festival name, etc.).
    #[serde(default)]
    pub note: Option<String>,
}

// --- Watch providers ---

/// Response from `{kind}/{id}/watch/providers` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbWatchProviders {
    /// TMDB ID.
    #[serde(default)]
    pub id: u64,
    /// Providers keyed by region code.
    #[serde(default)]
    pub results: BTreeMap<String, TmdbRegionProviders>,
}

/// Watch providers for one region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbRegionProviders {
    /// TMDB watch page link.
    #[serde(default)]
    pub link: Option<String>,
    /// Subscription streaming providers.
    #[serde(default)]
    pub flatrate: Vec<TmdbProvider>,
    /// Rental providers.
    #[serde(default)]
    pub rent: Vec<TmdbProvider>,
    /// Purchase providers.
    #[serde(default)]
    pub buy: Vec<TmdbProvider>,
}

/// A single watch provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProvider {
    /// Provider ID.
    pub provider_id: u64,
    /// Provider name.
    pub provider_name: String,
    /// Display priority.
    #[serde(default)]
    pub display_priority: Option<u32>,
}

// --- Videos ---

/// Response from `{kind}/{id}/videos` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideos {
    /// TMDB ID.
    #[serde(default)]
    pub id: u64,
    /// Videos attached to the title.
    pub results: Vec<TmdbVideo>,
}

/// A single video entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    /// Site-specific video key.
    pub key: String,
    /// Hosting site (e.g., "YouTube").
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Video name.
    #[serde(default)]
    pub name: Option<String>,
    /// Official flag.
    #[serde(default)]
    pub official: bool,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for `search/{kind}` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Genre filter.
    pub with_genres: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            with_genres: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the genre filter.
    #[must_use]
    pub const fn with_genres(mut self, genre_id: Option<u32>) -> Self {
        self.with_genres = genre_id;
        self
    }
}

/// Parameters for `discover/{kind}` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Genre filter.
    pub with_genres: Option<u32>,
    /// Cast member filter (TMDB person ID).
    pub with_cast: Option<u64>,
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            page: 1,
            with_genres: None,
            with_cast: None,
        }
    }
}

impl DiscoverParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the genre filter.
    #[must_use]
    pub const fn with_genres(mut self, genre_id: Option<u32>) -> Self {
        self.with_genres = genre_id;
        self
    }

    /// Sets the cast member filter.
    #[must_use]
    pub const fn with_cast(mut self, person_id: u64) -> Self {
        self.with_cast = Some(person_id);
        self
    }
}
