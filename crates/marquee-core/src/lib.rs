//! Core browsing logic for marquee.
//!
//! - [`availability`]: classifies a title's viewing availability from
//!   release dates and watch providers.
//! - [`resolver`]: fetches both inputs concurrently and classifies them.
//! - [`card`], [`detail`]: listing cards and the selected-title view.
//! - [`browse`]: paged popular, actor, and search listings.
//! - [`slug`]: title slugs and share links.

pub mod availability;
pub mod browse;
pub mod card;
pub mod clock;
pub mod detail;
pub mod genres;
pub mod resolver;
pub mod slug;

#[cfg(test)]
mod test_support;
