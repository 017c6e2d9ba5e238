//! Media card presentation for listings.
#![allow(clippy::future_not_send)]

use std::fmt;

use chrono::NaiveDate;
use futures::future::join_all;
use marquee_api::tmdb::{MediaKind, TmdbMediaSummary};
use tracing::instrument;

use crate::availability::AvailabilityLabel;
use crate::clock::Clock;
use crate::genres::GenreMap;
use crate::resolver::{AvailabilityResolver, LocalReleaseFetcher, LocalWatchProviderFetcher};

/// Poster image base URL (300px width).
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w300";

/// Kind of a listed title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardKind {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
    /// Animated film.
    Animation,
    /// Anything else TMDB lists (e.g. `person` in multi search).
    Other(String),
}

impl CardKind {
    /// Derives the kind from a summary.
    ///
    /// Uses `media_type` when present, otherwise a title marks a movie and
    /// its absence a series.
    #[must_use]
    pub fn of(summary: &TmdbMediaSummary) -> Self {
        match summary.media_type.as_deref() {
            Some("movie") => Self::Movie,
            Some("tv") => Self::Tv,
            Some("animation") => Self::Animation,
            Some(other) => Self::Other(other.to_owned()),
            None if summary.title.is_some() => Self::Movie,
            None => Self::Tv,
        }
    }

    /// TMDB endpoint family used for lookups, if any.
    #[must_use]
    pub const fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Self::Movie | Self::Animation => Some(MediaKind::Movie),
            Self::Tv => Some(MediaKind::Tv),
            Self::Other(_) => None,
        }
    }

    /// Whether cards of this kind carry an availability badge.
    #[must_use]
    pub const fn has_badge(&self) -> bool {
        matches!(self, Self::Movie | Self::Animation)
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Tv => f.write_str("tv"),
            Self::Animation => f.write_str("animation"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// One rendered listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCard {
    /// TMDB id.
    pub id: u64,
    /// Card kind.
    pub kind: CardKind,
    /// Title or series name.
    pub title: String,
    /// Formatted release or first-air date.
    pub date: String,
    /// Comma-separated genre names.
    pub genres: String,
    /// Five-star rating.
    pub stars: String,
    /// Vote average out of ten (e.g. `8.3/10`).
    pub score: String,
    /// Poster URL, if the title has one.
    pub poster_url: Option<String>,
    /// Availability badge (movies and animation only).
    pub badge: Option<AvailabilityLabel>,
}

impl MediaCard {
    /// Builds a card without a badge.
    #[must_use]
    pub fn from_summary(summary: &TmdbMediaSummary, genres: &GenreMap) -> Self {
        let date = summary
            .release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| summary.first_air_date.as_deref().filter(|d| !d.is_empty()));
        Self {
            id: summary.id,
            kind: CardKind::of(summary),
            title: summary.display_title().to_owned(),
            date: format_date(date),
            genres: genres.describe(&summary.genre_ids),
            stars: star_rating(summary.vote_average),
            score: vote_score(summary.vote_average),
            poster_url: poster_url(summary.poster_path.as_deref()),
            badge: None,
        }
    }
}

/// Renders a 0-10 vote average as five stars.
///
/// `round(vote / 2)` stars are filled; the rest are hollow.
#[must_use]
pub fn star_rating(vote_average: f64) -> String {
    let filled = (vote_average / 2.0).round();
    (0_u8..5)
        .map(|i| if f64::from(i) < filled { "★" } else { "☆" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a vote average with one decimal, out of ten.
#[must_use]
pub fn vote_score(vote_average: f64) -> String {
    format!("{vote_average:.1}/10")
}

/// Formats a `YYYY-MM-DD` date as `M/D/YYYY`.
///
/// Unparseable input is shown as is; missing input reads `Unknown Date`.
#[must_use]
pub fn format_date(date: Option<&str>) -> String {
    match date {
        None | Some("") => String::from("Unknown Date"),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_or_else(|_| raw.to_owned(), |d| d.format("%-m/%-d/%Y").to_string()),
    }
}

/// Full poster URL for a TMDB image path.
#[must_use]
pub fn poster_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{POSTER_BASE_URL}{p}"))
}

/// Builds cards for a listing, resolving badges concurrently.
///
/// Order follows `summaries`. Cards without a badge kind are not looked up.
#[instrument(skip_all, fields(count = summaries.len()))]
pub async fn build_cards<R, W, C>(
    summaries: &[TmdbMediaSummary],
    genres: &GenreMap,
    resolver: &AvailabilityResolver<R, W, C>,
) -> Vec<MediaCard>
where
    R: LocalReleaseFetcher,
    W: LocalWatchProviderFetcher,
    C: Clock,
{
    let cards = summaries.iter().map(|summary| async move {
        let mut card = MediaCard::from_summary(summary, genres);
        if card.kind.has_badge() {
            card.badge = Some(resolver.resolve(MediaKind::Movie, card.id).await);
        }
        card
    });
    join_all(cards).await
}
