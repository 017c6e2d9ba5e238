//! API client library for marquee.
//!
//! Provides a typed client for the TMDB v3 API.

/// TMDB API client.
pub mod tmdb;
