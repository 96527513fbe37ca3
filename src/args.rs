use clap::Parser;
use secrecy::SecretString;
use std::{fmt::Display, str::FromStr};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Print a report for `--user` and exit instead of serving HTTP
    #[clap(long, requires = "user")]
    pub cli: bool,

    /// GitHub username to analyze
    #[clap(short, long, env = "GITHUB_USER")]
    pub user: Option<String>,

    /// API OAuth access token
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// HTTP server port
    #[clap(short, long, env, default_value_t = 8080)]
    pub port: u16,

    /// Maximal parallel repository languages requests
    #[clap(long, env, default_value_t = 10, parse(try_from_str=max_lang_req_in_range))]
    pub max_lang_req: u32,

    /// Timeout of a single API request in seconds
    #[clap(long, env, default_value_t = 15, parse(try_from_str=request_timeout_in_range))]
    pub request_timeout: u64,
}

fn max_lang_req_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, u32::MAX, "max_lang_req".to_string())
}

fn request_timeout_in_range(value: &str) -> clap::Result<u64, String> {
    number_in_range(value, 1, 3600, "request_timeout".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}
