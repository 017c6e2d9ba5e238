//! Fetch-then-classify glue around the availability classifier.
#![allow(clippy::future_not_send)]

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use marquee_api::tmdb::{
    LocalTmdbApi, MediaKind, TmdbProvider, TmdbReleaseDates, TmdbWatchProviders,
};
use tracing::instrument;

use crate::availability::{
    AvailabilityLabel, ClassificationInput, ReleaseRecord, WatchProviderSet, classify, release_day,
};
use crate::clock::Clock;

/// Region code → watch providers.
pub type WatchProviderMap = BTreeMap<String, WatchProviderSet>;

/// Source of a title's release records.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ReleaseFetcher: Send)]
pub trait LocalReleaseFetcher {
    /// Fetches release records flattened across all countries.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn fetch_releases(&self, kind: MediaKind, id: u64) -> Result<Vec<ReleaseRecord>>;
}

/// Source of a title's per-region watch providers.
#[trait_variant::make(WatchProviderFetcher: Send)]
pub trait LocalWatchProviderFetcher {
    /// Fetches watch providers keyed by region code.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn fetch_watch_providers(&self, kind: MediaKind, id: u64) -> Result<WatchProviderMap>;
}

/// Adapts a TMDB API client to both fetcher traits.
#[derive(Debug)]
pub struct TmdbSource<'a, A> {
    api: &'a A,
}

impl<A> Clone for TmdbSource<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for TmdbSource<'_, A> {}

impl<'a, A> TmdbSource<'a, A> {
    /// Wraps an API client.
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: LocalTmdbApi> LocalReleaseFetcher for TmdbSource<'_, A> {
    async fn fetch_releases(&self, kind: MediaKind, id: u64) -> Result<Vec<ReleaseRecord>> {
        let raw = self
            .api
            .release_dates(kind, id)
            .await
            .with_context(|| format!("failed to fetch release dates for {kind}/{id}"))?;
        Ok(flatten_release_dates(&raw))
    }
}

impl<A: LocalTmdbApi> LocalWatchProviderFetcher for TmdbSource<'_, A> {
    async fn fetch_watch_providers(&self, kind: MediaKind, id: u64) -> Result<WatchProviderMap> {
        let raw = self
            .api
            .watch_providers(kind, id)
            .await
            .with_context(|| format!("failed to fetch watch providers for {kind}/{id}"))?;
        Ok(provider_map(&raw))
    }
}

/// Flattens per-country release dates into one list, keeping encounter order.
///
/// Entries whose date cannot be parsed are dropped.
#[must_use]
pub fn flatten_release_dates(raw: &TmdbReleaseDates) -> Vec<ReleaseRecord> {
    raw.results
        .iter()
        .flat_map(|country| country.release_dates.iter())
        .filter_map(|entry| {
            let Some(day) = release_day(&entry.release_date) else {
                tracing::debug!(
                    release_date = %entry.release_date,
                    "skipping release with unparseable date"
                );
                return None;
            };
            Some(ReleaseRecord::new(entry.release_type, day))
        })
        .collect()
}

/// Converts TMDB watch providers into provider-name sets per region.
#[must_use]
pub fn provider_map(raw: &TmdbWatchProviders) -> WatchProviderMap {
    let names = |providers: &[TmdbProvider]| -> Vec<String> {
        providers.iter().map(|p| p.provider_name.clone()).collect()
    };
    raw.results
        .iter()
        .map(|(region, providers)| {
            (
                region.clone(),
                WatchProviderSet {
                    flatrate: names(&providers.flatrate),
                    rent: names(&providers.rent),
                    buy: names(&providers.buy),
                },
            )
        })
        .collect()
}

/// Resolves availability labels by fetching both data sources concurrently.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<R, W, C> {
    releases: R,
    providers: W,
    clock: C,
}

impl<'a, A: LocalTmdbApi, C: Clock> AvailabilityResolver<TmdbSource<'a, A>, TmdbSource<'a, A>, C> {
    /// Resolver backed by a single TMDB client.
    pub const fn from_tmdb(api: &'a A, clock: C) -> Self {
        let source = TmdbSource::new(api);
        Self::new(source, source, clock)
    }
}

impl<R, W, C> AvailabilityResolver<R, W, C>
where
    R: LocalReleaseFetcher,
    W: LocalWatchProviderFetcher,
    C: Clock,
{
    /// Creates a resolver from explicit collaborators.
    pub const fn new(releases: R, providers: W, clock: C) -> Self {
        Self {
            releases,
            providers,
            clock,
        }
    }

    /// Fetches release dates and watch providers concurrently and classifies.
    ///
    /// Never fails: if either fetch fails both inputs are replaced with
    /// empty data, which classifies as [`AvailabilityLabel::Unknown`].
    #[instrument(skip_all, fields(kind = %kind, id = id))]
    pub async fn resolve(&self, kind: MediaKind, id: u64) -> AvailabilityLabel {
        let (releases, providers) = tokio::join!(
            self.releases.fetch_releases(kind, id),
            self.providers.fetch_watch_providers(kind, id),
        );
        let today = self.clock.today();

        let input = match (releases, providers) {
            (Ok(releases), Ok(watch_providers)) => ClassificationInput {
                releases,
                watch_providers,
                today,
            },
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %format!("{e:#}"), "availability lookup failed");
                ClassificationInput::empty(today)
            }
        };

        classify(&input)
    }
}
