//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    DiscoverParams, MediaKind, SearchParams, TmdbErrorResponse, TmdbGenreList, TmdbMediaDetails,
    TmdbMediaPage, TmdbPersonPage, TmdbReleaseDates, TmdbVideos, TmdbWatchProviders,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How the client authenticates against TMDB.
#[derive(Debug, Clone)]
enum Credential {
    /// API read access token, sent as `Authorization: Bearer`.
    Bearer(String),
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request credential.
    credential: Credential,
    /// Default response language.
    language: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    api_key: Option<String>,
    language: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            api_key: None,
            language: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API read access token (bearer auth).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the v3 API key (query parameter auth).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the default response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// The bearer token wins when both a token and an API key are set.
    ///
    /// # Errors
    ///
    /// - neither `api_token` nor `api_key` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential = match (self.api_token, self.api_key) {
            (Some(token), _) => Credential::Bearer(token),
            (None, Some(key)) => Credential::ApiKey(key),
            (None, None) => bail!("api_token or api_key is required"),
        };
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential,
            language: self.language.unwrap_or_else(|| String::from("en-US")),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the default response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sends a GET request with credentials, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let builder = self.http_client.get(url.clone()).query(query);
            let builder = match &self.credential {
                Credential::Bearer(token) => builder.bearer_auth(token),
                Credential::ApiKey(key) => builder.query(&[("api_key", key)]),
            };
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(path, "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(kind = %kind))]
    async fn genres(&self, kind: MediaKind, language: &str) -> Result<TmdbGenreList> {
        let path = format!("genre/{kind}/list");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(kind = %kind, page = page))]
    async fn trending(&self, kind: MediaKind, page: u32, language: &str) -> Result<TmdbMediaPage> {
        let path = format!("trending/{kind}/week");
        let query = [
            ("page", page.to_string()),
            ("language", String::from(language)),
        ];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(kind = %kind))]
    async fn discover(&self, kind: MediaKind, params: &DiscoverParams) -> Result<TmdbMediaPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];
        if let Some(genre_id) = params.with_genres {
            query.push(("with_genres", genre_id.to_string()));
        }
        if let Some(person_id) = params.with_cast {
            query.push(("with_cast", person_id.to_string()));
        }

        self.get_json(&format!("discover/{kind}"), &query).await
    }

    #[instrument(skip_all, fields(kind = %kind))]
    async fn search(&self, kind: MediaKind, params: &SearchParams) -> Result<TmdbMediaPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(genre_id) = params.with_genres {
            query.push(("with_genres", genre_id.to_string()));
        }

        self.get_json(&format!("search/{kind}"), &query).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, query: &str) -> Result<TmdbMediaPage> {
        let query = [
            ("query", String::from(query)),
            ("language", self.language.clone()),
        ];
        self.get_json("search/multi", &query).await
    }

    #[instrument(skip_all)]
    async fn search_person(&self, query: &str) -> Result<TmdbPersonPage> {
        let query = [
            ("query", String::from(query)),
            ("language", self.language.clone()),
        ];
        self.get_json("search/person", &query).await
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn details(&self, kind: MediaKind, id: u64) -> Result<TmdbMediaDetails> {
        let query = [("language", self.language.clone())];
        self.get_json(&format!("{kind}/{id}"), &query).await
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn release_dates(&self, kind: MediaKind, id: u64) -> Result<TmdbReleaseDates> {
        self.get_json(&format!("{kind}/{id}/release_dates"), &[])
            .await
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn watch_providers(&self, kind: MediaKind, id: u64) -> Result<TmdbWatchProviders> {
        self.get_json(&format!("{kind}/{id}/watch/providers"), &[])
            .await
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<TmdbVideos> {
        self.get_json(&format!("{kind}/{id}/videos"), &[]).await
    }
}
