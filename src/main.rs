mod config;
mod gh_api_search_repo_response;
mod github_api_utils;
mod repo;
mod search_view;

use config::Config;
use github_api_utils::{github_api_helper::GithubApiFetcher, search_query::QueryConfig};
use search_view::{SearchState, SearchView};

use dotenv::dotenv;
use std::process::ExitCode;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

const USAGE: &str = "Usage: github_search search <term> [page] [sort]
  sort: best_match (default), stars, forks, help-wanted-issues, updated";

#[tokio::main]
async fn main() -> ExitCode {
    // load env variables
    dotenv().ok();
    pretty_env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("search") => {
            let term = match args.get(2) {
                Some(term) => term,
                None => {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            };
            let query = match QueryConfig::parse(
                term,
                args.get(3).map(String::as_str),
                args.get(4).map(String::as_str),
            ) {
                Ok(query) => query,
                Err(err) => {
                    error!("{err}");
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            };
            let config = match Config::from_env() {
                Ok(config) => config,
                Err(err) => {
                    error!("{err}");
                    return ExitCode::FAILURE;
                }
            };

            let fetcher = GithubApiFetcher::new(reqwest::Client::new(), config);
            let view = SearchView::mount(&fetcher, query).await;
            print!("{}", view.text());
            info!("Rendered search for '{}'", view.query().term);

            if let SearchState::Failed(_) = view.state() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Some(other) => {
            error!("Unrecognized argument {}, closing...", other);
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
        None => {
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
