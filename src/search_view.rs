use std::fmt::Write;

use chrono::DateTime;

use crate::github_api_utils::{
    github_api_helper::{RepoFetcher, SearchPage},
    search_query::QueryConfig,
};
use crate::repo::Repo;

pub const HEADING: &str = "Github Repository Search";

/// What the view shows below the heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// No term given, nothing was fetched.
    Idle,
    Empty,
    Results(SearchPage),
    Failed(String),
}

/// Search results for a single query. Mounting fetches once, rendering is pure.
#[derive(Debug, Clone)]
pub struct SearchView {
    query: QueryConfig,
    state: SearchState,
}

impl SearchView {
    pub async fn mount<F: RepoFetcher + ?Sized>(fetcher: &F, query: QueryConfig) -> Self {
        let state = if !query.has_term() {
            SearchState::Idle
        } else {
            match fetcher.fetch(&query).await {
                Ok(page) if page.repos.is_empty() => SearchState::Empty,
                Ok(page) => SearchState::Results(page),
                Err(err) => {
                    error!("Search for '{}' failed: {err}", query.term);
                    SearchState::Failed(err.to_string())
                }
            }
        };
        SearchView { query, state }
    }

    pub fn query(&self) -> &QueryConfig {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn text(&self) -> String {
        render(&self.query, &self.state)
    }
}

pub fn render(query: &QueryConfig, state: &SearchState) -> String {
    let mut out = String::new();
    // writing into a String can't fail
    let _ = render_into(&mut out, query, state);
    out
}

fn render_into(out: &mut String, query: &QueryConfig, state: &SearchState) -> std::fmt::Result {
    writeln!(out, "{HEADING}")?;
    writeln!(out, "{}", "=".repeat(HEADING.len()))?;

    if let SearchState::Idle = state {
        writeln!(out, "Enter a search term to find repositories.")?;
        return Ok(());
    }
    writeln!(
        out,
        "Search: {} (page {}, sorted by {})",
        query.term.trim(),
        query.page,
        query.sort
    )?;
    writeln!(out)?;

    match state {
        SearchState::Idle => {}
        SearchState::Empty => {
            writeln!(out, "No repositories found for \"{}\".", query.term.trim())?;
        }
        SearchState::Failed(message) => {
            writeln!(out, "Search failed: {message}")?;
        }
        SearchState::Results(page) => {
            let found = page.total_count.max(page.repos.len() as u64);
            let noun = if found == 1 { "repository" } else { "repositories" };
            writeln!(out, "{found} {noun} found")?;
            if let Some(last) = page.last_page() {
                writeln!(out, "Page {} of {}", query.page, last)?;
            }
            if let Some(next) = page.links.next {
                writeln!(out, "Next page: {next}")?;
            }
            if page.incomplete_results {
                writeln!(out, "(results may be incomplete)")?;
            }
            for repo in &page.repos {
                writeln!(out)?;
                render_repo(out, repo)?;
            }
        }
    }
    Ok(())
}

fn render_repo(out: &mut String, repo: &Repo) -> std::fmt::Result {
    writeln!(out, "{}  ★ {}", repo.full_name, repo.stars)?;
    if !repo.description.trim().is_empty() {
        writeln!(out, "  {}", repo.description.trim())?;
    }

    let mut facts = Vec::new();
    if !repo.language.is_empty() {
        facts.push(format!("Language: {}", repo.language));
    }
    if !repo.license.is_empty() {
        facts.push(format!("License: {}", repo.license));
    }
    if !facts.is_empty() {
        writeln!(out, "  {}", facts.join(" | "))?;
    }
    if !repo.tags.is_empty() {
        writeln!(out, "  Topics: {}", repo.tags.join(", "))?;
    }
    writeln!(out, "  Owner: {} ({})", repo.owner, repo.owner_url)?;
    writeln!(
        out,
        "  Created: {} | Updated: {}",
        display_date(&repo.created_at),
        display_date(&repo.updated_at)
    )?;
    writeln!(out, "  {}", repo.url)
}

/// Shortens rfc3339 timestamps to their date, anything else is shown as is.
fn display_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_owned(),
    }
}
