//! Title slugs and shareable links.
#![allow(clippy::future_not_send)]

use std::sync::LazyLock;

use anyhow::{Context, Result};
use marquee_api::tmdb::{LocalTmdbApi, TmdbMediaSummary};
use regex::Regex;
use tracing::instrument;
use url::Url;

use crate::card::CardKind;

/// Query parameter carrying the slug in share links.
pub const TITLE_PARAM: &str = "title";

/// Runs of characters outside `[a-z0-9]`.
#[allow(clippy::expect_used)]
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("failed to compile slug regex"));

/// Converts a title into a URL slug.
///
/// ```
/// assert_eq!(marquee_core::slug::title_slug("Dune: Part Two"), "dune-part-two");
/// ```
#[must_use]
pub fn title_slug(title: &str) -> String {
    NON_SLUG_RE
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Builds a share link: `base` with `?title=<slug>`.
#[must_use]
pub fn share_url(base: &Url, slug: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair(TITLE_PARAM, slug);
    url
}

/// Extracts the slug from a share link.
#[must_use]
pub fn slug_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == TITLE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|slug| !slug.is_empty())
}

/// Accepts either a share link or a bare slug.
#[must_use]
pub fn slug_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => slug_from_url(&url),
        Err(_) if input.is_empty() => None,
        Err(_) => Some(input.to_owned()),
    }
}

/// Finds the title a slug refers to.
///
/// Searches movies and series with the slug's words and returns the first
/// result whose title slugs to the same value. People are skipped.
/// Dashes in the slug are sent as spaces, not as the raw slug text.
///
/// # Errors
///
/// Returns an error if the search request fails.
#[instrument(skip_all, fields(slug = slug))]
pub async fn resolve_slug(api: &impl LocalTmdbApi, slug: &str) -> Result<Option<TmdbMediaSummary>> {
    let query = slug.replace('-', " ");
    let page = api
        .search_multi(query.trim())
        .await
        .with_context(|| format!("failed to search for slug {slug}"))?;

    let found = page.results.into_iter().find(|result| {
        CardKind::of(result).media_kind().is_some() && title_slug(result.display_title()) == slug
    });
    match &found {
        Some(result) => tracing::debug!(id = result.id, "slug resolved"),
        None => tracing::debug!("no title matches slug"),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use marquee_api::tmdb::TmdbMediaPage;

    use super::*;
    use crate::test_support::{MockTmdbApi, fixture};

    #[test]
    fn test_title_slug() {
        // Arrange & Act & Assert
        assert_eq!(title_slug("Dune: Part Two"), "dune-part-two");
        assert_eq!(title_slug("WALL·E"), "wall-e");
        assert_eq!(title_slug("Spider-Man: Across the Spider-Verse"), "spider-man-across-the-spider-verse");
        assert_eq!(title_slug("  Alien  "), "-alien-");
        assert_eq!(title_slug("1917"), "1917");
    }

    #[test]
    fn test_share_url_replaces_existing_query() {
        // Arrange
        let base: Url = "https://example.org/marquee/?ref=home".parse().unwrap();

        // Act
        let url = share_url(&base, "dune-part-two");

        // Assert
        assert_eq!(url.as_str(), "https://example.org/marquee/?title=dune-part-two");
    }

    #[test]
    fn test_slug_from_url() {
        // Arrange
        let url: Url = "https://example.org/marquee/?title=dune-part-two"
            .parse()
            .unwrap();
        let empty: Url = "https://example.org/marquee/?title=".parse().unwrap();

        // Act & Assert
        assert_eq!(slug_from_url(&url).as_deref(), Some("dune-part-two"));
        assert_eq!(slug_from_url(&empty), None);
    }

    #[test]
    fn test_slug_from_input_accepts_bare_slug() {
        // Arrange & Act & Assert
        assert_eq!(slug_from_input(" dune ").as_deref(), Some("dune"));
        assert_eq!(slug_from_input(""), None);
        assert_eq!(
            slug_from_input("https://example.org/?title=dune").as_deref(),
            Some("dune")
        );
    }

    #[tokio::test]
    async fn test_resolve_slug_matches_title_slug() {
        // Arrange
        let page: TmdbMediaPage = fixture!("search_multi_dune.json");
        let api = MockTmdbApi {
            search_multi: Some(page),
            ..MockTmdbApi::default()
        };

        // Act
        let found = resolve_slug(&api, "dune-part-two").await.unwrap();

        // Assert
        assert_eq!(found.unwrap().id, 693_134);
        assert_eq!(api.calls(), vec![String::from("search_multi query=dune part two")]);
    }

    #[tokio::test]
    async fn test_resolve_slug_matches_tv_name() {
        // Arrange
        let api = MockTmdbApi {
            search_multi: Some(fixture!("search_multi_dune.json")),
            ..MockTmdbApi::default()
        };

        // Act
        let found = resolve_slug(&api, "dune").await.unwrap().unwrap();

        // Assert
        assert_eq!(found.id, 1191);
        assert_eq!(found.media_type.as_deref(), Some("tv"));
    }

    #[tokio::test]
    async fn test_resolve_slug_without_match() {
        // Arrange
        let api = MockTmdbApi {
            search_multi: Some(fixture!("search_multi_dune.json")),
            ..MockTmdbApi::default()
        };

        // Act
        let found = resolve_slug(&api, "arrival").await.unwrap();

        // Assert
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_resolve_slug_propagates_search_failure() {
        // Arrange
        let api = MockTmdbApi::default();

        // Act
        let result = resolve_slug(&api, "dune").await;

        // Assert
        assert!(result.is_err());
    }
}
