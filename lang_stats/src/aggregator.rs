use crate::api::{AggregationError, Client, LanguageBytes, LanguageStat, RepoRef};
use crate::payload;
use futures::{stream, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

pub struct LanguageStatsCalculator<const MAX_REPOS_PAGE: u32, CLIENT>
where
    CLIENT: 'static + Client<MAX_REPOS_PAGE>,
{
    client: Arc<CLIENT>,
    max_lang_requests: usize,
}

impl<const MAX_REPOS_PAGE: u32, CLIENT> LanguageStatsCalculator<MAX_REPOS_PAGE, CLIENT>
where
    CLIENT: 'static + Client<MAX_REPOS_PAGE>,
{
    /// # Arguments
    /// * `client` - API client used for every outbound request
    /// * `max_lang_requests` - maximal number of parallel language breakdown requests, at least 1
    pub fn new(client: CLIENT, max_lang_requests: usize) -> Self {
        LanguageStatsCalculator {
            client: Arc::new(client),
            max_lang_requests: std::cmp::max(max_lang_requests, 1),
        }
    }

    pub async fn language_stats(&self, username: &str) -> Result<Vec<LanguageStat>, AggregationError> {
        let repos = self.list_repositories(username).await?;
        info!("Found {} repositories with language data of {}", repos.len(), username.trim());
        let languages = self.aggregate(repos).await?;
        debug!("Found {} languages of {}", languages.len(), username.trim());
        Ok(normalize(&languages))
    }

    pub async fn list_repositories(&self, username: &str) -> Result<Vec<RepoRef>, AggregationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AggregationError::InvalidUsername);
        }
        let repos_url = self
            .client
            .user_repos_url(username, MAX_REPOS_PAGE)
            .map_err(AggregationError::FetchFailed)?;
        debug!("Listing repositories: {}", repos_url);
        let body = self.client.fetch(&repos_url).await.map_err(|err| match err.status() {
            Some(404) => AggregationError::UserNotFound(username.to_string()),
            _ => AggregationError::FetchFailed(err),
        })?;
        let repos = serde_json::from_slice::<Vec<payload::Repo>>(&body)
            .map_err(|err| AggregationError::MalformedListing(err.to_string()))?;
        if repos.is_empty() {
            return Err(AggregationError::NoRepositories(username.to_string()));
        }
        Ok(repos.into_iter().filter_map(payload::Repo::into_repo_ref).collect())
    }

    /// Sums language bytes of all `repos`. Repositories which cannot be fetched or parsed are skipped.
    pub async fn aggregate(&self, repos: Vec<RepoRef>) -> Result<LanguageBytes, AggregationError> {
        let languages = stream::iter(repos)
            .map(|repo| Self::repo_languages(self.client.clone(), repo))
            .buffer_unordered(self.max_lang_requests)
            .filter_map(map_repo_languages_result)
            .fold(LanguageBytes::new(), |mut total, languages| async move {
                merge_languages(&mut total, languages);
                total
            })
            .await;
        if languages.is_empty() {
            return Err(AggregationError::NoLanguageData);
        }
        Ok(languages)
    }

    fn repo_languages(client: Arc<CLIENT>, repo: RepoRef) -> JoinHandle<Option<LanguageBytes>> {
        tokio::spawn(async move {
            let body = match client.fetch(&repo.languages_url).await {
                Ok(body) => body,
                Err(err) => {
                    warn!("Error fetching languages of {}: {}", repo.languages_url, err);
                    return None;
                }
            };
            match serde_json::from_slice::<payload::Languages>(&body) {
                Ok(languages) => Some(languages),
                Err(err) => {
                    warn!("Error parsing languages of {}: {}", repo.languages_url, err);
                    None
                }
            }
        })
    }
}

/// Utility functions

//TODO async only because StreamExt::filter_map expects a future
async fn map_repo_languages_result(languages: Result<Option<LanguageBytes>, JoinError>) -> Option<LanguageBytes> {
    match languages {
        Ok(languages) => languages,
        Err(err) => {
            error!("Failed to get repository languages: {:?}", err);
            None
        }
    }
}

fn merge_languages(total: &mut LanguageBytes, languages: LanguageBytes) {
    for (language, bytes) in languages.into_iter().filter(|(_, bytes)| *bytes > 0) {
        let sum = total.entry(language).or_insert(0);
        *sum = sum.saturating_add(bytes);
    }
}

/// Converts merged byte counts into percentages of the total.
///
/// Result is sorted by percentage in descending order, equal percentages by language name.
pub fn normalize(languages: &LanguageBytes) -> Vec<LanguageStat> {
    let total_bytes: u128 = languages.values().map(|bytes| *bytes as u128).sum();
    if total_bytes == 0 {
        return Vec::new();
    }
    let mut stats: Vec<LanguageStat> = languages
        .iter()
        .map(|(language, bytes)| {
            let percent = round2(*bytes as f64 / total_bytes as f64 * 100.0);
            LanguageStat::new(language.clone(), percent, *bytes)
        })
        .collect();
    stats.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.language.cmp(&b.language))
    });
    stats
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tests
