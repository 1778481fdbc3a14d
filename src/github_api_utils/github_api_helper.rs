use crate::config::Config;
use crate::gh_api_search_repo_response::{ErrorResponse, GetRepoResponse};
use crate::github_api_utils::{search_query::QueryConfig, SearchError};
use crate::repo::Repo;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};

/// Github never serves more than this many results for one search.
pub const MAX_SEARCH_RESULTS: u64 = 1000;

/// Page numbers advertised by the `link` response header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<u32>,
    pub last: Option<u32>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub repos: Vec<Repo>,
    pub total_count: u64,
    pub incomplete_results: bool,
    pub per_page: u32,
    pub links: PageLinks,
}

impl SearchPage {
    /// Last reachable page: the one named by the link header, otherwise
    /// derived from the total count and github's result cap.
    pub fn last_page(&self) -> Option<u32> {
        if let Some(last) = self.links.last {
            return Some(last);
        }
        if self.per_page == 0 || self.total_count == 0 {
            return None;
        }
        let reachable = self.total_count.min(MAX_SEARCH_RESULTS);
        let pages = (reachable + self.per_page as u64 - 1) / self.per_page as u64;
        u32::try_from(pages).ok()
    }
}

/// Source of repository search results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoFetcher: Sync + Send {
    /// Fetches the page of repositories matching `query`.
    async fn fetch(&self, query: &QueryConfig) -> Result<SearchPage, SearchError>;
}

/// Fetches repositories from the github rest search api.
pub struct GithubApiFetcher {
    client: Client,
    config: Config,
}

impl GithubApiFetcher {
    pub fn new(client: Client, config: Config) -> Self {
        GithubApiFetcher { client, config }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/search/repositories",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RepoFetcher for GithubApiFetcher {
    async fn fetch(&self, query: &QueryConfig) -> Result<SearchPage, SearchError> {
        if !query.has_term() {
            return Err(SearchError::InvalidQuery("empty search term".to_string()));
        }
        let headers = get_requests_headers(&self.config.user_agent)?;
        let params = query.to_params(self.config.per_page);

        info!(
            "Searching repositories for '{}' (page {}, sorted by {})",
            query.term, query.page, query.sort
        );
        let response = self
            .client
            .get(self.search_url())
            .headers(headers)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let links = get_page_links_from_response_header(response.headers().get("link"));
        let body = response.text().await?;

        if !status.is_success() {
            error!("Request failed: {}", status);
            return Err(SearchError::Status {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }
        info!("Request successful: {}", status);

        decode_search_page(&body, self.config.per_page, links)
    }
}

/// Creates the standard github api request headers:
/// 1. **accept**, the github json media type.
/// 2. **X-GitHub-Api-Version**, github api version.
/// 3. **user-agent**, required by github for every request.
fn get_requests_headers(user_agent: &str) -> Result<HeaderMap, SearchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
    headers.insert(USER_AGENT, user_agent.parse()?);
    Ok(headers)
}

/// Reads the `next` and `last` page numbers out of a github `link` header, e.g.
/// `<https://api.github.com/search/repositories?q=x&page=2>; rel="next", <...&page=34>; rel="last"`
pub(crate) fn get_page_links_from_response_header(link_header: Option<&HeaderValue>) -> PageLinks {
    let mut page_links = PageLinks::default();
    let link_header = match link_header {
        Some(value) => value,
        None => return page_links,
    };
    let links = match link_header.to_str() {
        Ok(links) => links,
        Err(err) => {
            warn!("Couldn't read link header, ignoring it: {err}");
            return page_links;
        }
    };

    for link in links.split(',') {
        let mut parts = link.split(';');
        let target = parts.next().unwrap_or_default().trim();
        let rel = parts
            .map(str::trim)
            .find_map(|param| param.strip_prefix("rel="))
            .map(|rel| rel.trim_matches('"'));

        // drop the surrounding angle brackets
        let url = target.trim_start_matches('<').trim_end_matches('>');
        let page = match page_param(url) {
            Some(page) => page,
            None => {
                warn!("No page number in link {url}");
                continue;
            }
        };
        match rel {
            Some("next") => page_links.next = Some(page),
            Some("last") => page_links.last = Some(page),
            _ => {}
        }
    }
    page_links
}

fn page_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

fn error_message(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

pub(crate) fn decode_search_page(
    body: &str,
    per_page: u32,
    links: PageLinks,
) -> Result<SearchPage, SearchError> {
    let response: GetRepoResponse = serde_json::from_str(body)?;
    if response.incomplete_results {
        warn!("Github returned incomplete results, the search timed out");
    }
    let total_count = response.len;
    let incomplete_results = response.incomplete_results;
    let repos = response.into_repos();
    info!("Found {} repositories ({} total)", repos.len(), total_count);

    Ok(SearchPage {
        repos,
        total_count,
        incomplete_results,
        per_page,
        links,
    })
}
