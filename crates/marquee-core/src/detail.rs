//! Selected-title view.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use marquee_api::tmdb::{LocalTmdbApi, MediaKind, TmdbVideos};
use tracing::instrument;
use url::Url;

use crate::availability::AvailabilityLabel;
use crate::card::{format_date, poster_url, star_rating};
use crate::clock::Clock;
use crate::resolver::{AvailabilityResolver, LocalReleaseFetcher, LocalWatchProviderFetcher};
use crate::slug::{share_url, title_slug};

/// Embed URL prefix for YouTube trailers.
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Everything shown for one selected title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDetail {
    /// TMDB id.
    pub id: u64,
    /// Endpoint family the title was loaded from.
    pub kind: MediaKind,
    /// Title or series name.
    pub title: String,
    /// Tagline, if any.
    pub tagline: Option<String>,
    /// Plot overview, if any.
    pub overview: Option<String>,
    /// Formatted release or first-air date.
    pub date: String,
    /// Comma-separated genre names.
    pub genres: String,
    /// Five-star rating.
    pub stars: String,
    /// Runtime in minutes (movies).
    pub runtime: Option<u32>,
    /// Season count (series).
    pub seasons: Option<u32>,
    /// Production status (e.g. `Released`).
    pub status: Option<String>,
    /// Poster URL, if the title has one.
    pub poster_url: Option<String>,
    /// Availability label.
    pub label: AvailabilityLabel,
    /// YouTube trailer embed URL.
    pub trailer_url: Option<String>,
    /// Title slug.
    pub slug: String,
    /// Shareable link carrying the slug.
    pub share_url: Url,
}

/// First YouTube trailer as an embed URL.
#[must_use]
pub fn trailer_url(videos: &TmdbVideos) -> Option<String> {
    videos
        .results
        .iter()
        .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
        .map(|v| format!("{YOUTUBE_EMBED_BASE}{}", v.key))
}

/// Loads the detail view of a title.
///
/// Details are required. Videos and the availability label are fetched
/// concurrently; a failed video lookup leaves the trailer empty. Series have
/// no release dates, so they classify as [`AvailabilityLabel::Unknown`].
///
/// # Errors
///
/// Returns an error if the details request fails.
#[instrument(skip_all, fields(kind = %kind, id = id))]
pub async fn load_detail<A, R, W, C>(
    api: &A,
    resolver: &AvailabilityResolver<R, W, C>,
    kind: MediaKind,
    id: u64,
    share_base: &Url,
) -> Result<MediaDetail>
where
    A: LocalTmdbApi,
    R: LocalReleaseFetcher,
    W: LocalWatchProviderFetcher,
    C: Clock,
{
    let details = api
        .details(kind, id)
        .await
        .with_context(|| format!("failed to fetch details for {kind}/{id}"))?;

    let (videos, label) = tokio::join!(api.videos(kind, id), resolver.resolve(kind, id));

    let trailer_url = match videos {
        Ok(videos) => trailer_url(&videos),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "failed to fetch videos");
            None
        }
    };

    let title = details.display_title().to_owned();
    let slug = title_slug(&title);
    let date = details
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .or_else(|| details.first_air_date.as_deref().filter(|d| !d.is_empty()));
    let genres = if details.genres.is_empty() {
        String::from("N/A")
    } else {
        details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    Ok(MediaDetail {
        id: details.id,
        kind,
        date: format_date(date),
        genres,
        stars: star_rating(details.vote_average),
        runtime: details.runtime,
        seasons: details.number_of_seasons,
        poster_url: poster_url(details.poster_path.as_deref()),
        label,
        trailer_url,
        share_url: share_url(share_base, &slug),
        slug,
        title,
        tagline: details.tagline.filter(|t| !t.is_empty()),
        overview: details.overview.filter(|o| !o.is_empty()),
        status: details.status,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;
    use marquee_api::tmdb::TmdbMediaDetails;

    use super::*;
    use crate::clock::FixedClock;
    use crate::test_support::{MockTmdbApi, fixture};

    fn share_base() -> Url {
        "https://example.org/marquee/".parse().unwrap()
    }

    fn dune_api() -> MockTmdbApi {
        MockTmdbApi {
            details: Some(fixture!("movie_details_693134.json")),
            videos: Some(fixture!("movie_videos_693134.json")),
            release_dates: Some(fixture!("movie_release_dates_693134.json")),
            watch_providers: Some(fixture!("movie_watch_providers_693134.json")),
            ..MockTmdbApi::default()
        }
    }

    #[test]
    fn test_trailer_url_picks_first_youtube_trailer() {
        // Arrange
        let videos: TmdbVideos = fixture!("movie_videos_693134.json");

        // Act
        let url = trailer_url(&videos);

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/U2Qp5pL3ovA")
        );
    }

    #[test]
    fn test_trailer_url_ignores_other_sites() {
        // Arrange
        let videos: TmdbVideos = serde_json::from_str(
            r#"{"id":1,"results":[{"key":"v1","site":"Vimeo","type":"Trailer"},{"key":"y1","site":"YouTube","type":"Teaser"}]}"#,
        )
        .unwrap();

        // Act & Assert
        assert_eq!(trailer_url(&videos), None);
    }

    #[tokio::test]
    async fn test_load_detail_movie() {
        // Arrange
        let api = dune_api();
        let resolver =
            AvailabilityResolver::from_tmdb(&api, FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));

        // Act
        let detail = load_detail(&api, &resolver, MediaKind::Movie, 693_134, &share_base())
            .await
            .unwrap();

        // Assert
        assert_eq!(detail.title, "Dune: Part Two");
        assert_eq!(detail.tagline.as_deref(), Some("Long live the fighters."));
        assert_eq!(detail.runtime, Some(167));
        assert_eq!(detail.genres, "Science Fiction, Adventure");
        assert_eq!(detail.label, AvailabilityLabel::Hd);
        assert_eq!(
            detail.trailer_url.as_deref(),
            Some("https://www.youtube.com/embed/U2Qp5pL3ovA")
        );
        assert_eq!(detail.slug, "dune-part-two");
        assert_eq!(
            detail.share_url.as_str(),
            "https://example.org/marquee/?title=dune-part-two"
        );
    }

    #[tokio::test]
    async fn test_load_detail_tv_is_unknown_quality() {
        // Arrange
        let details: TmdbMediaDetails = serde_json::from_str(
            r#"{"id":1399,"name":"Game of Thrones","first_air_date":"2011-04-17","number_of_seasons":8,"vote_average":8.4}"#,
        )
        .unwrap();
        let api = MockTmdbApi {
            details: Some(details),
            ..MockTmdbApi::default()
        };
        let resolver =
            AvailabilityResolver::from_tmdb(&api, FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));

        // Act
        let detail = load_detail(&api, &resolver, MediaKind::Tv, 1399, &share_base())
            .await
            .unwrap();

        // Assert
        assert_eq!(detail.label, AvailabilityLabel::Unknown);
        assert_eq!(detail.label.to_string(), "Unknown Quality");
        assert_eq!(detail.trailer_url, None);
        assert_eq!(detail.seasons, Some(8));
        assert_eq!(detail.date, "4/17/2011");
        assert_eq!(detail.genres, "N/A");
        assert_eq!(detail.slug, "game-of-thrones");
        assert!(api.calls().contains(&String::from("release_dates tv 1399")));
    }

    #[tokio::test]
    async fn test_load_detail_requires_details() {
        // Arrange
        let api = MockTmdbApi::default();
        let resolver =
            AvailabilityResolver::from_tmdb(&api, FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));

        // Act
        let result = load_detail(&api, &resolver, MediaKind::Movie, 1, &share_base()).await;

        // Assert
        assert!(result.is_err());
    }
}
