use crate::GithubClient;
use lang_stats::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "GitHub-Language-Analyzer";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(|_| anyhow::anyhow!("API token is not a valid header value"))?;
        value.set_sensitive(true);
        Ok(self.with_header_value(header::AUTHORIZATION, value))
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.timeout = timeout;
        self
    }

    fn with_header_value(mut self, key: HeaderName, val: HeaderValue) -> GithubClientBuilder {
        self.headers.insert(key, val);
        self
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url = Url::parse(self.github_url.trim_end_matches('/'))
            .map_err(|err| lang_stats::api::Error::Config(format!("invalid API URL {}: {}", self.github_url, err)))?;
        if github_url.cannot_be_a_base() {
            return Err(lang_stats::api::Error::Config(format!(
                "API URL {} cannot be a base",
                self.github_url
            )));
        }
        let client = self
            .client_builder
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(GithubClient { client, github_url })
    }
}

#[test]
fn build_test() -> anyhow::Result<()> {
    let client = GithubClientBuilder::default()
        .with_github_url("http://localhost:8080/api/")
        .build()?;
    assert_eq!(client.github_url.as_str(), "http://localhost:8080/api");

    let err = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(matches!(err, Err(lang_stats::api::Error::Config(_))));

    let err = GithubClientBuilder::default()
        .with_github_url("mailto:octo@example.com")
        .build();
    assert!(matches!(err, Err(lang_stats::api::Error::Config(_))));

    let err = GithubClientBuilder::default().try_with_token(secrecy::SecretString::new("bad\ntoken".to_string()));
    assert!(matches!(err, Err(lang_stats::api::Error::Other(_))));
    Ok(())
}
