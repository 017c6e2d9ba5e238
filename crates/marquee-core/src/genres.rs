//! Genre id → name lookup.
#![allow(clippy::future_not_send)]

use std::collections::BTreeMap;

use marquee_api::tmdb::{LocalTmdbApi, MediaKind, TmdbGenreList};
use tracing::instrument;

/// Genre names keyed by TMDB genre id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreMap(BTreeMap<u32, String>);

impl GenreMap {
    /// Returns the name of a genre id.
    #[must_use]
    pub fn name(&self, id: u32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Joins the names of `ids`; unmapped ids read `Unknown`, no ids read `N/A`.
    #[must_use]
    pub fn describe(&self, ids: &[u32]) -> String {
        if ids.is_empty() {
            return String::from("N/A");
        }
        ids.iter()
            .map(|id| self.name(*id).unwrap_or("Unknown"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Iterates genres ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<TmdbGenreList> for GenreMap {
    fn from(list: TmdbGenreList) -> Self {
        Self(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }
}

/// Loads the genre map for a media kind.
///
/// A failed request yields an empty map; cards then show `Unknown` genres.
#[instrument(skip_all, fields(kind = %kind))]
pub async fn load_genres(api: &impl LocalTmdbApi, kind: MediaKind, language: &str) -> GenreMap {
    match api.genres(kind, language).await {
        Ok(list) => GenreMap::from(list),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "failed to fetch genres");
            GenreMap::default()
        }
    }
}
