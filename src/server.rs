use actix_cors::Cors;
use actix_web::http::{header, Method, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, ResponseError};
use lang_stats::api::{AggregationError, AggregationErrorKind, Client, Result};
use lang_stats::LanguageStatsCalculator;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RATE_LIMIT_INFO: &str = "GitHub API rate limits apply. Add GITHUB_TOKEN for higher limits.";

#[derive(Deserialize, Debug)]
pub struct LanguagesQuery {
    username: Option<String>,
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Error, Debug)]
pub enum LangStatsHttpError {
    #[error("Username parameter is required")]
    MissingUsername,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl LangStatsHttpError {
    fn kind(&self) -> Option<&'static str> {
        match self {
            LangStatsHttpError::MissingUsername => Some(AggregationErrorKind::InvalidUsername.into()),
            LangStatsHttpError::MethodNotAllowed => None,
            LangStatsHttpError::Aggregation(err) => Some(err.kind().into()),
        }
    }
}

impl ResponseError for LangStatsHttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            LangStatsHttpError::MissingUsername => StatusCode::BAD_REQUEST,
            LangStatsHttpError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            LangStatsHttpError::Aggregation(err) => match err {
                AggregationError::InvalidUsername => StatusCode::BAD_REQUEST,
                AggregationError::UserNotFound(_)
                | AggregationError::NoRepositories(_)
                | AggregationError::NoLanguageData => StatusCode::NOT_FOUND,
                AggregationError::FetchFailed(_) | AggregationError::MalformedListing(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message: self.to_string(),
            kind: self.kind(),
        })
    }
}

async fn languages<const MAX_REPOS_PAGE: u32, CLIENT>(
    calculator: web::Data<LanguageStatsCalculator<MAX_REPOS_PAGE, CLIENT>>,
    query: web::Query<LanguagesQuery>,
) -> std::result::Result<HttpResponse, LangStatsHttpError>
where
    CLIENT: 'static + Client<MAX_REPOS_PAGE>,
{
    let username = query
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(LangStatsHttpError::MissingUsername)?;
    let stats = calculator.language_stats(username).await.map_err(|err| {
        error!("Error getting language stats of {}: {}", username, err);
        err
    })?;
    Ok(HttpResponse::Ok()
        .insert_header(("X-RateLimit-Info", RATE_LIMIT_INFO))
        .json(stats))
}

async fn options() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn method_not_allowed() -> std::result::Result<HttpResponse, LangStatsHttpError> {
    Err(LangStatsHttpError::MethodNotAllowed)
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// Registers `/languages` served by the `LanguageStatsCalculator` found in app data.
///
/// CORS preflights are answered by the `cors()` middleware, any other `OPTIONS` gets an empty 200.
pub fn configure<const MAX_REPOS_PAGE: u32, CLIENT>(cfg: &mut web::ServiceConfig)
where
    CLIENT: 'static + Client<MAX_REPOS_PAGE>,
{
    cfg.service(
        web::resource("/languages")
            .route(web::get().to(languages::<MAX_REPOS_PAGE, CLIENT>))
            .route(web::method(Method::OPTIONS).to(options))
            .default_service(web::to(method_not_allowed)),
    );
}

pub async fn serve<const MAX_REPOS_PAGE: u32, CLIENT>(
    calculator: LanguageStatsCalculator<MAX_REPOS_PAGE, CLIENT>,
    port: u16,
    authenticated: bool,
) -> Result<()>
where
    CLIENT: 'static + Client<MAX_REPOS_PAGE>,
{
    info!("Starting GitHub Language Analyzer Server");
    info!("Using port: {}", port);
    if authenticated {
        info!("Using GITHUB_TOKEN for authentication");
    } else {
        warn!("Running without GITHUB_TOKEN - limited to 60 requests/hour");
    }
    info!(
        "Access the endpoint at: http://localhost:{}/languages?username=USERNAME",
        port
    );

    let calculator = web::Data::new(calculator);
    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .app_data(calculator.clone())
            .configure(configure::<MAX_REPOS_PAGE, CLIENT>)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;
    Ok(())
}

#[test]
fn status_code_test() {
    use lang_stats::api::FetchError;

    let cases = vec![
        (LangStatsHttpError::MissingUsername, StatusCode::BAD_REQUEST),
        (LangStatsHttpError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        (AggregationError::InvalidUsername.into(), StatusCode::BAD_REQUEST),
        (AggregationError::UserNotFound("a".into()).into(), StatusCode::NOT_FOUND),
        (AggregationError::NoRepositories("a".into()).into(), StatusCode::NOT_FOUND),
        (AggregationError::NoLanguageData.into(), StatusCode::NOT_FOUND),
        (
            AggregationError::FetchFailed(FetchError::Network("reset".into())).into(),
            StatusCode::BAD_GATEWAY,
        ),
        (AggregationError::MalformedListing("eof".into()).into(), StatusCode::BAD_GATEWAY),
    ];
    for (err, status) in cases {
        assert_eq!(err.status_code(), status, "{:?}", err);
    }
}
