//! Language statistics of a GitHub user
//!
//! # Overview
//!
//! Given a username, library lists the user's repositories (a single page of at most `MAX_REPOS_PAGE` entries),
//! fetches the language breakdown (language name to number of bytes) of every repository and sums the bytes
//! per language. The merged breakdown is then turned into percentages of the total, rounded to two decimal
//! places, and sorted by percentage in descending order. Languages with equal percentage are ordered by name.
//!
//! Fetching the breakdown of a single repository may fail (timeouts, rate limits, malformed bodies). Such
//! repositories are skipped and the statistics reflect the repositories which could be read. Failing to list
//! the repositories, or ending up without any language data, fails the whole request.

pub mod api;

#[cfg(feature = "aggregator")]
mod aggregator;
#[cfg(feature = "aggregator")]
mod payload;

#[cfg(feature = "aggregator")]
pub use aggregator::{normalize, round2, LanguageStatsCalculator};
