use lang_stats::api::{AggregationError, FetchErrorKind, LanguageStat};
use lang_stats_app::language_stats_calculator;
use lang_stats_app::Args;
use secrecy::SecretString;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MAX_REPOS_PAGE: u32 = 100;
const USER: &str = "octo";

fn args(server: &MockServer) -> Args {
    Args {
        cli: true,
        user: Some(USER.to_string()),
        api_token: None,
        api_url: server.uri(),
        port: 8080,
        max_lang_req: 4,
        request_timeout: 15,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn happy_path_30() {
    let server = MockServer::start().await;

    const REPOS_COUNT: u32 = 30;
    // Every repo has 100 bytes of Rust, every 3rd also 50 bytes of Shell
    const SHELL_DIVISOR: u32 = 3;

    let repos: Vec<String> = (0..REPOS_COUNT).map(|i| format!("repo_{}", i)).collect();
    mock_repos(&server, &repos).await;
    for (index, repo) in repos.iter().enumerate() {
        let body = if index as u32 % SHELL_DIVISOR == 0 {
            r#"{ "Rust": 100, "Shell": 50 }"#
        } else {
            r#"{ "Rust": 100 }"#
        };
        mock_languages(&server, repo, ResponseTemplate::new(200).set_body_raw(body, "application/json")).await;
    }

    let calculator = language_stats_calculator(args(&server)).unwrap();
    let stats = calculator.language_stats(USER).await.unwrap();

    // 3000 bytes of Rust, 500 bytes of Shell
    assert_eq!(
        stats,
        vec![
            LanguageStat::new("Rust".to_string(), 85.71, 3000),
            LanguageStat::new("Shell".to_string(), 14.29, 500),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_repos_are_skipped() {
    let server = MockServer::start().await;

    let repos = vec!["ok".to_string(), "forbidden".to_string(), "broken".to_string()];
    mock_repos(&server, &repos).await;
    mock_languages(
        &server,
        "ok",
        ResponseTemplate::new(200).set_body_raw(r#"{ "Go": 1, "Rust": 1 }"#, "application/json"),
    )
    .await;
    mock_languages(
        &server,
        "forbidden",
        ResponseTemplate::new(403).set_body_string("API rate limit exceeded"),
    )
    .await;
    mock_languages(
        &server,
        "broken",
        ResponseTemplate::new(200).set_body_raw("<html>", "text/html"),
    )
    .await;

    let calculator = language_stats_calculator(args(&server)).unwrap();
    let stats = calculator.language_stats(USER).await.unwrap();

    assert_eq!(
        stats,
        vec![
            LanguageStat::new("Go".to_string(), 50.0, 1),
            LanguageStat::new("Rust".to_string(), 50.0, 1),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hung_repo_times_out() {
    let server = MockServer::start().await;

    let repos = vec!["fast".to_string(), "hung".to_string()];
    mock_repos(&server, &repos).await;
    mock_languages(
        &server,
        "fast",
        ResponseTemplate::new(200).set_body_raw(r#"{ "C": 42 }"#, "application/json"),
    )
    .await;
    mock_languages(
        &server,
        "hung",
        ResponseTemplate::new(200)
            .set_body_raw(r#"{ "Java": 1000 }"#, "application/json")
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let calculator = language_stats_calculator(Args {
        request_timeout: 1,
        ..args(&server)
    })
    .unwrap();
    let stats = calculator.language_stats(USER).await.unwrap();

    assert_eq!(stats, vec![LanguageStat::new("C".to_string(), 100.0, 42)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/users/{}/repos", USER)))
        .and(header("Authorization", "token s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let calculator = language_stats_calculator(Args {
        api_token: Some(SecretString::new("s3cr3t".to_string())),
        ..args(&server)
    })
    .unwrap();
    let err = calculator.language_stats(USER).await.unwrap_err();

    assert_eq!(err, AggregationError::NoRepositories(USER.to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unknown_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"{ "message": "Not Found", "documentation_url": "https://docs.github.com" }"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let calculator = language_stats_calculator(args(&server)).unwrap();
    let err = calculator.language_stats("ghost").await.unwrap_err();

    assert_eq!(err, AggregationError::UserNotFound("ghost".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listing_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/users/{}/repos", USER)))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let calculator = language_stats_calculator(args(&server)).unwrap();
    let err = calculator.language_stats(USER).await.unwrap_err();

    match err {
        AggregationError::FetchFailed(err) => {
            assert_eq!(err.kind(), FetchErrorKind::UpstreamError);
            assert_eq!(err.status(), Some(500));
        }
        err => panic!("Got unexpected error: {:?}", err),
    }
}

async fn mock_repos(server: &MockServer, repos: &[String]) {
    let entries: Vec<String> = repos
        .iter()
        .map(|repo| {
            format!(
                r#"{{
                    "name": "{}",
                    "owner": {{ "login": "{}" }},
                    "languages_url": "{}/repos/{}/{}/languages"
                }}"#,
                repo,
                USER,
                server.uri(),
                USER,
                repo
            )
        })
        .collect();
    let body = format!("[{}]", entries.join(","));

    Mock::given(method("GET"))
        .and(path(format!("/users/{}/repos", USER)))
        .and(query_param("per_page", format!("{}", MAX_REPOS_PAGE)))
        .and(header("Accept", "application/vnd.github.v3+json"))
        .and(header("User-Agent", "GitHub-Language-Analyzer"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .expect(1)
        .mount(server)
        .await;
}

async fn mock_languages(server: &MockServer, repo: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/languages", USER, repo)))
        .respond_with(response)
        .mount(server)
        .await;
}
