use async_trait::async_trait;
use lang_stats::api::FetchError;
use log::debug;
use reqwest::Client;
use url::Url;

mod builder;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Largest page of the repository listing served by the GitHub API.
pub const MAX_REPOS_PAGE: u32 = 100;

pub struct GithubClient {
    client: Client,
    github_url: Url,
}

#[async_trait]
impl lang_stats::api::Client<MAX_REPOS_PAGE> for GithubClient {
    fn user_repos_url(&self, username: &str, per_page: u32) -> Result<String, FetchError> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidRequest(format!("{} cannot be a base", self.github_url)))?
            .pop_if_empty()
            .extend(&["users", username, "repos"]);
        url.query_pairs_mut().append_pair("per_page", &per_page.to_string());
        Ok(url.into())
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(locator).map_err(|err| FetchError::InvalidRequest(format!("{}: {}", locator, err)))?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else if err.is_builder() {
        FetchError::InvalidRequest(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}
