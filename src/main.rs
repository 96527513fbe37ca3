use clap::Parser;
use lang_stats_app::Args;

#[actix_web::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = lang_stats_app::run(args).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
