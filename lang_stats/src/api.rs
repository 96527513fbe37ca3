use async_trait::async_trait;
use derive_more::Constructor;
use serde::Serialize;
use std::collections::HashMap;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Cumulative byte count per language name.
pub type LanguageBytes = HashMap<String, u64>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single outbound request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("API error {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchErrorKind {
    InvalidRequest,
    Timeout,
    NetworkError,
    UpstreamError,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidRequest(_) => FetchErrorKind::InvalidRequest,
            FetchError::Timeout(_) => FetchErrorKind::Timeout,
            FetchError::Network(_) => FetchErrorKind::NetworkError,
            FetchError::Upstream { .. } => FetchErrorKind::UpstreamError,
        }
    }

    /// HTTP status of an upstream error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Terminal outcome of a language statistics request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("username must not be empty")]
    InvalidUsername,
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("no repositories found for user {0}")]
    NoRepositories(String),
    #[error("no language data found in repositories")]
    NoLanguageData,
    #[error("failed to fetch repositories: {0}")]
    FetchFailed(#[source] FetchError),
    #[error("failed to parse repository data: {0}")]
    MalformedListing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AggregationErrorKind {
    InvalidUsername,
    UserNotFound,
    NoRepositories,
    NoLanguageData,
    FetchFailed,
    MalformedListing,
}

impl AggregationError {
    pub fn kind(&self) -> AggregationErrorKind {
        match self {
            AggregationError::InvalidUsername => AggregationErrorKind::InvalidUsername,
            AggregationError::UserNotFound(_) => AggregationErrorKind::UserNotFound,
            AggregationError::NoRepositories(_) => AggregationErrorKind::NoRepositories,
            AggregationError::NoLanguageData => AggregationErrorKind::NoLanguageData,
            AggregationError::FetchFailed(_) => AggregationErrorKind::FetchFailed,
            AggregationError::MalformedListing(_) => AggregationErrorKind::MalformedListing,
        }
    }
}

/// Repository of the queried user, reduced to the locator of its language breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RepoRef {
    pub languages_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Constructor)]
pub struct LanguageStat {
    pub language: String,
    pub percent: f64,
    pub bytes: u64,
}

/// Read-only access to a code hosting API.
///
/// `MAX_REPOS_PAGE` is the largest repository listing page the API serves.
#[async_trait]
pub trait Client<const MAX_REPOS_PAGE: u32>: Send + Sync {
    /// Locator of the repository listing of `username`, `per_page` entries long.
    fn user_repos_url(&self, username: &str, per_page: u32) -> std::result::Result<String, FetchError>;

    /// Issues a single GET for `locator` and returns the raw response body.
    async fn fetch(&self, locator: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

#[test]
fn error_kind_test() {
    let err = AggregationError::FetchFailed(FetchError::Timeout("slow".into()));
    assert_eq!(err.kind(), AggregationErrorKind::FetchFailed);
    assert_eq!(err.kind().to_string(), "fetch_failed");
    assert_eq!(err.to_string(), "failed to fetch repositories: request timed out: slow");

    let upstream = FetchError::Upstream {
        status: 502,
        body: "bad gateway".into(),
    };
    assert_eq!(upstream.kind().to_string(), "upstream_error");
    assert_eq!(upstream.status(), Some(502));
    assert_eq!(FetchError::Network("reset".into()).status(), None);
}
