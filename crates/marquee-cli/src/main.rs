//! marquee - browse TMDB listings and classify release availability.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use marquee_api::tmdb::{MediaKind, TmdbClient};
use marquee_core::browse::{BrowseMode, BrowseSession};
use marquee_core::card::{CardKind, build_cards};
use marquee_core::clock::{Clock, FixedClock, SystemClock};
use marquee_core::detail::{MediaDetail, load_detail};
use marquee_core::genres::load_genres;
use marquee_core::resolver::AvailabilityResolver;
use marquee_core::slug::{resolve_slug, slug_from_input};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List genres for a media type.
    Genres(GenresArgs),
    /// List trending titles, or a genre's titles.
    Popular(PopularArgs),
    /// List titles featuring an actor.
    Actor(ActorArgs),
    /// Search titles by name.
    Search(SearchArgs),
    /// Show details of a title.
    Show(ShowArgs),
    /// Open a title from a slug or share link.
    Open(OpenArgs),
    /// Print the availability label of a title.
    Label(LabelArgs),
}

/// Media type selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    /// Movies.
    Movie,
    /// TV series.
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => Self::Movie,
            KindArg::Tv => Self::Tv,
        }
    }
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PopularArgs {
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
    /// Genre ID filter (see `genres`).
    #[arg(long)]
    genre: Option<u32>,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `actor` subcommand.
#[derive(clap::Args)]
struct ActorArgs {
    /// Actor name (e.g. "Keanu Reeves").
    #[arg(long, required = true)]
    name: String,
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "Dune").
    #[arg(long, required = true)]
    query: String,
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
    /// Genre ID filter (see `genres`).
    #[arg(long)]
    genre: Option<u32>,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
}

/// Arguments for the `open` subcommand.
#[derive(clap::Args)]
struct OpenArgs {
    /// Title slug (e.g. "dune-part-two") or a share link.
    #[arg(long, required = true)]
    title: String,
}

/// Arguments for the `label` subcommand.
#[derive(clap::Args)]
struct LabelArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Media type.
    #[arg(long = "type", value_enum, default_value = "movie")]
    kind: KindArg,
    /// Classify as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    today: Option<NaiveDate>,
}

/// Loads the config file and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    tracing::debug!(path = %path.display(), "loading config");
    Ok(AppConfig::load(&path)?.with_env())
}

/// Builds a `TmdbClient` from the loaded config.
///
/// # Errors
///
/// Returns an error if no credential is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let tmdb = &config.tmdb;
    if tmdb.api_token.is_none() && tmdb.api_key.is_none() {
        bail!(
            "TMDB credentials are required: set TMDB_API_TOKEN or TMDB_API_KEY, \
             or tmdb.api_token / tmdb.api_key in config.toml"
        );
    }

    let mut builder = TmdbClient::builder()
        .language(tmdb.language.as_str())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(token) = &tmdb.api_token {
        builder = builder.api_token(token.as_str());
    }
    if let Some(key) = &tmdb.api_key {
        builder = builder.api_key(key.as_str());
    }
    if let Some(base_url) = &tmdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Parses the configured share link base.
///
/// # Errors
///
/// Returns an error if `share.base_url` is not a valid URL.
fn share_base(config: &AppConfig) -> Result<Url> {
    Url::parse(&config.share.base_url)
        .with_context(|| format!("invalid share.base_url: {}", config.share.base_url))
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let genres = load_genres(&client, args.kind.into(), client.language()).await;

    if genres.is_empty() {
        tracing::info!("No genres available");
        return Ok(());
    }
    tracing::info!("ID\tName");
    for (id, name) in genres.iter() {
        tracing::info!("{}\t{}", id, name);
    }
    Ok(())
}

/// Prints the current page of a browse session as cards.
async fn print_listing(client: &TmdbClient, session: &BrowseSession<'_, TmdbClient>) {
    let genres = load_genres(client, session.kind(), client.language()).await;
    let resolver = AvailabilityResolver::from_tmdb(client, SystemClock);
    let cards = build_cards(session.results(), &genres, &resolver).await;

    match session.mode() {
        BrowseMode::Popular => tracing::info!("Popular {}", session.kind()),
        BrowseMode::Actor { name, .. } => tracing::info!("Titles featuring {}", name),
        BrowseMode::Search(query) => tracing::info!("Search results for \"{}\"", query),
    }
    if cards.is_empty() {
        tracing::info!("No results found");
        return;
    }
    tracing::info!("ID\tKind\tTitle\t\t\tDate\t\tRating\t\tGenres\tAvailability");
    for card in &cards {
        tracing::info!(
            "{}\t{}\t{}\t\t\t{}\t{} {}\t{}\t{}",
            card.id,
            card.kind,
            card.title,
            card.date,
            card.stars,
            card.score,
            card.genres,
            card.badge.map_or("-", |b| b.as_str()),
        );
    }
    tracing::info!("Page {} of {}", session.page(), session.total_pages());
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the listing request fails.
#[instrument(skip_all)]
async fn run_popular(args: &PopularArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let mut session = BrowseSession::new(&client, args.kind.into(), client.language());
    session.set_genre(args.genre);
    session.load_popular(args.page).await?;
    print_listing(&client, &session).await;
    Ok(())
}

/// Runs the `actor` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or a request fails.
#[instrument(skip_all)]
async fn run_actor(args: &ActorArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let mut session = BrowseSession::new(&client, args.kind.into(), client.language());
    session.search_actor(&args.name).await?;
    session.go_to_page(args.page).await?;
    print_listing(&client, &session).await;
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let mut session = BrowseSession::new(&client, args.kind.into(), client.language());
    session.set_genre(args.genre);
    session.search(&args.query).await?;
    session.go_to_page(args.page).await?;
    print_listing(&client, &session).await;
    Ok(())
}

/// Prints a detail view.
fn print_detail(detail: &MediaDetail) {
    tracing::info!("ID: {}", detail.id);
    tracing::info!("Title: {}", detail.title);
    if let Some(tagline) = &detail.tagline {
        tracing::info!("Tagline: {}", tagline);
    }
    tracing::info!("Date: {}", detail.date);
    tracing::info!("Genres: {}", detail.genres);
    tracing::info!("Rating: {}", detail.stars);
    if let Some(runtime) = detail.runtime {
        tracing::info!("Runtime: {} min", runtime);
    }
    if let Some(seasons) = detail.seasons {
        tracing::info!("Seasons: {}", seasons);
    }
    tracing::info!("Status: {}", detail.status.as_deref().unwrap_or("-"));
    tracing::info!("Availability: {}", detail.label);
    tracing::info!("Poster: {}", detail.poster_url.as_deref().unwrap_or("-"));
    tracing::info!("Trailer: {}", detail.trailer_url.as_deref().unwrap_or("-"));
    tracing::info!("Share: {}", detail.share_url);
    if let Some(overview) = &detail.overview {
        tracing::info!("---");
        tracing::info!("{}", overview);
    }
}

/// Runs the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the details request fails.
#[instrument(skip_all)]
async fn run_show(args: &ShowArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let share_base = share_base(config)?;
    let resolver = AvailabilityResolver::from_tmdb(&client, SystemClock);

    let detail = load_detail(&client, &resolver, args.kind.into(), args.id, &share_base).await?;
    print_detail(&detail);
    Ok(())
}

/// Runs the `open` subcommand.
///
/// # Errors
///
/// Returns an error if the input carries no slug, the client fails to build,
/// or a request fails.
#[instrument(skip_all)]
async fn run_open(args: &OpenArgs, config: &AppConfig) -> Result<()> {
    let Some(slug) = slug_from_input(&args.title) else {
        bail!("no title slug found in {:?}", args.title);
    };
    let client = build_tmdb_client(config)?;
    let share_base = share_base(config)?;

    let Some(found) = resolve_slug(&client, &slug).await? else {
        tracing::info!("No title matches \"{}\"", slug);
        return Ok(());
    };
    let kind = CardKind::of(&found)
        .media_kind()
        .unwrap_or(MediaKind::Movie);
    let resolver = AvailabilityResolver::from_tmdb(&client, SystemClock);
    let detail = load_detail(&client, &resolver, kind, found.id, &share_base).await?;
    print_detail(&detail);
    Ok(())
}

/// Classifies one title and prints its label.
async fn print_label<C: Clock>(client: &TmdbClient, kind: MediaKind, id: u64, clock: C) {
    let resolver = AvailabilityResolver::from_tmdb(client, clock);
    let label = resolver.resolve(kind, id).await;
    tracing::info!("{}", label);
}

/// Runs the `label` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_label(args: &LabelArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let kind = args.kind.into();
    match args.today {
        Some(today) => print_label(&client, kind, args.id, FixedClock(today)).await,
        None => print_label(&client, kind, args.id, SystemClock).await,
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let config = load_config(cli.dir.as_ref())?;
    match cli.command {
        Commands::Genres(args) => run_genres(&args, &config).await,
        Commands::Popular(args) => run_popular(&args, &config).await,
        Commands::Actor(args) => run_actor(&args, &config).await,
        Commands::Search(args) => run_search(&args, &config).await,
        Commands::Show(args) => run_show(&args, &config).await,
        Commands::Open(args) => run_open(&args, &config).await,
        Commands::Label(args) => run_label(&args, &config).await,
    }
}
