//! Release-availability classification.
//!
//! Maps a title's release dates and per-region watch providers to a single
//! badge label. The heuristic works over incomplete third-party metadata;
//! branch order is significant and encodes the label precedence
//! `HD > Cam > Not Released Yet > Rental/Buy Available > Unknown Quality`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Regions whose watch providers are evaluated, in evaluation order.
pub const EVALUATED_REGIONS: [&str; 4] = ["US", "UK", "CA", "AU"];

/// TMDB release type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    /// Premiere (1).
    Premiere,
    /// Limited theatrical run (2).
    TheatricalLimited,
    /// Theatrical (3).
    Theatrical,
    /// Digital (4).
    Digital,
    /// Physical media (5).
    Physical,
    /// TV or streaming premiere (6).
    Tv,
    /// Any code TMDB may add later.
    Other(u8),
}

impl From<u8> for ReleaseType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Premiere,
            2 => Self::TheatricalLimited,
            3 => Self::Theatrical,
            4 => Self::Digital,
            5 => Self::Physical,
            6 => Self::Tv,
            other => Self::Other(other),
        }
    }
}

impl ReleaseType {
    /// Digital and TV/streaming premieres count as an HD release.
    const fn is_digital(self) -> bool {
        matches!(self, Self::Digital | Self::Tv)
    }
}

/// A single release of a title in some country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// Release kind.
    pub release_type: ReleaseType,
    /// Release calendar date.
    pub release_date: NaiveDate,
}

impl ReleaseRecord {
    /// Creates a record from a raw TMDB type code.
    #[must_use]
    pub fn new(code: u8, release_date: NaiveDate) -> Self {
        Self {
            release_type: ReleaseType::from(code),
            release_date,
        }
    }
}

/// Watch providers offered in one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchProviderSet {
    /// Subscription streaming providers.
    pub flatrate: Vec<String>,
    /// Rental providers.
    pub rent: Vec<String>,
    /// Purchase providers.
    pub buy: Vec<String>,
}

/// Fully resolved facts for one classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInput {
    /// Releases flattened across all countries.
    pub releases: Vec<ReleaseRecord>,
    /// Watch providers keyed by region code.
    pub watch_providers: BTreeMap<String, WatchProviderSet>,
    /// Current calendar date.
    pub today: NaiveDate,
}

impl ClassificationInput {
    /// Input with no releases and no providers.
    #[must_use]
    pub const fn empty(today: NaiveDate) -> Self {
        Self {
            releases: Vec::new(),
            watch_providers: BTreeMap::new(),
            today,
        }
    }

    /// Provider sets of the evaluated regions, in evaluation order.
    /// Missing regions are skipped, which is the same as an empty set.
    fn evaluated_regions(&self) -> impl Iterator<Item = &WatchProviderSet> {
        EVALUATED_REGIONS
            .iter()
            .filter_map(|region| self.watch_providers.get(*region))
    }
}

/// Availability badge for a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityLabel {
    /// Streaming or digitally released.
    Hd,
    /// Only in theaters.
    Cam,
    /// Only future releases are known.
    NotReleasedYet,
    /// Rental or purchase only.
    RentalOrBuyAvailable,
    /// Nothing conclusive.
    Unknown,
}

impl AvailabilityLabel {
    /// Badge text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hd => "HD",
            Self::Cam => "Cam",
            Self::NotReleasedYet => "Not Released Yet",
            Self::RentalOrBuyAvailable => "Rental/Buy Available",
            Self::Unknown => "Unknown Quality",
        }
    }
}

impl fmt::Display for AvailabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean facts the label is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AvailabilityFacts {
    /// A digital or TV release is dated on or before today.
    pub is_digital_release: bool,
    /// The first theatrical release is dated on or before today.
    pub is_in_theaters: bool,
    /// Some release is dated after today.
    pub has_future_release: bool,
    /// An evaluated region has a subscription streaming provider.
    pub is_streaming_available: bool,
    /// An evaluated region has a rental or purchase provider.
    pub is_rental_or_purchase_available: bool,
}

impl AvailabilityFacts {
    /// Computes the facts for `input`.
    #[must_use]
    pub fn gather(input: &ClassificationInput) -> Self {
        let today = input.today;
        let releases = &input.releases;

        let is_digital_release = releases
            .iter()
            .any(|r| r.release_type.is_digital() && r.release_date <= today);

        // First encountered theatrical record only, not the earliest.
        let is_in_theaters = releases
            .iter()
            .find(|r| r.release_type == ReleaseType::Theatrical)
            .is_some_and(|r| r.release_date <= today);

        let has_future_release = releases.iter().any(|r| r.release_date > today);

        let is_streaming_available = input.evaluated_regions().any(|p| !p.flatrate.is_empty());

        let is_rental_or_purchase_available = input
            .evaluated_regions()
            .any(|p| !p.rent.is_empty() || !p.buy.is_empty());

        Self {
            is_digital_release,
            is_in_theaters,
            has_future_release,
            is_streaming_available,
            is_rental_or_purchase_available,
        }
    }

    /// Picks the label; the first satisfied branch wins.
    #[must_use]
    pub const fn label(self) -> AvailabilityLabel {
        if self.is_streaming_available || self.is_digital_release {
            AvailabilityLabel::Hd
        } else if self.is_in_theaters {
            AvailabilityLabel::Cam
        } else if self.has_future_release {
            AvailabilityLabel::NotReleasedYet
        } else if self.is_rental_or_purchase_available {
            AvailabilityLabel::RentalOrBuyAvailable
        } else {
            AvailabilityLabel::Unknown
        }
    }
}

/// Classifies a title's availability.
#[must_use]
pub fn classify(input: &ClassificationInput) -> AvailabilityLabel {
    let facts = AvailabilityFacts::gather(input);
    let label = facts.label();
    tracing::trace!(?facts, %label, "classified availability");
    label
}

/// Normalizes a TMDB release timestamp to its UTC calendar date.
///
/// Accepts RFC 3339 timestamps (`2024-02-27T00:00:00.000Z`) and plain
/// `YYYY-MM-DD` dates. Returns `None` for anything else.
#[must_use]
pub fn release_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
