use github_client::{GithubClient, GithubClientBuilder, MAX_REPOS_PAGE};
use lang_stats::api::Result;
use lang_stats::LanguageStatsCalculator;
use std::time::Duration;

pub mod args;
pub mod report;
pub mod server;

pub use args::Args;

pub type GithubLanguageStats = LanguageStatsCalculator<MAX_REPOS_PAGE, GithubClient>;

/// Builds the GitHub backed calculator. `args` are consumed so the API token is not kept around.
pub fn language_stats_calculator(args: Args) -> Result<GithubLanguageStats> {
    let mut client = GithubClientBuilder::default()
        .with_github_url(args.api_url)
        .with_timeout(Duration::from_secs(args.request_timeout));
    if let Some(token) = args.api_token {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    Ok(LanguageStatsCalculator::new(client, args.max_lang_req as usize))
}

/// Prints the report of `--user` in CLI mode, serves HTTP otherwise.
pub async fn run(args: Args) -> Result<()> {
    let cli_user = args.user.clone().filter(|_| args.cli);
    let port = args.port;
    let authenticated = args.api_token.is_some();
    let calculator = language_stats_calculator(args)?;

    match cli_user {
        Some(user) => report::print_report(&calculator, &user).await,
        None => server::serve(calculator, port, authenticated).await,
    }
}
