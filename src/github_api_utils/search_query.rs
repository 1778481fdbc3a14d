use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid page '{0}', pages start at 1")]
    InvalidPage(String),

    #[error("Unknown sort '{0}', expected one of best_match, stars, forks, help-wanted-issues, updated")]
    UnknownSort(String),
}

/// Sort keys accepted by the github repository search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    BestMatch,
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl Sort {
    /// Value of the `sort` request parameter. Best match is github's default
    /// and is requested by leaving the parameter out.
    pub fn api_value(&self) -> Option<&'static str> {
        match *self {
            Sort::BestMatch => None,
            Sort::Stars => Some("stars"),
            Sort::Forks => Some("forks"),
            Sort::HelpWantedIssues => Some("help-wanted-issues"),
            Sort::Updated => Some("updated"),
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Sort::BestMatch => "best match",
            Sort::Stars => "stars",
            Sort::Forks => "forks",
            Sort::HelpWantedIssues => "help wanted issues",
            Sort::Updated => "recently updated",
        }
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "best-match" => Ok(Sort::BestMatch),
            "stars" => Ok(Sort::Stars),
            "forks" => Ok(Sort::Forks),
            "help-wanted-issues" => Ok(Sort::HelpWantedIssues),
            "updated" => Ok(Sort::Updated),
            _ => Err(QueryError::UnknownSort(s.to_owned())),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Term, page and sort of a single search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub term: String,
    /// 1-based
    pub page: u32,
    pub sort: Sort,
}

impl QueryConfig {
    pub fn new(term: impl Into<String>) -> Self {
        QueryConfig {
            term: term.into(),
            page: 1,
            sort: Sort::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage(page.to_string()));
        }
        self.page = page;
        Ok(self)
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Builds a query from optional command line style strings, falling back
    /// to page 1 and best match.
    pub fn parse(term: &str, page: Option<&str>, sort: Option<&str>) -> Result<Self, QueryError> {
        let mut query = QueryConfig::new(term);
        if let Some(page) = page {
            let page = page
                .trim()
                .parse::<u32>()
                .map_err(|_| QueryError::InvalidPage(page.to_owned()))?;
            query = query.with_page(page)?;
        }
        if let Some(sort) = sort {
            query = query.with_sort(sort.parse()?);
        }
        Ok(query)
    }

    /// A blank term can't produce a meaningful search.
    pub fn has_term(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Request parameters for `GET /search/repositories`.
    pub fn to_params(&self, per_page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.term.trim().to_owned()),
            ("page", self.page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(sort) = self.sort.api_value() {
            params.push(("sort", sort.to_owned()));
        }
        params
    }
}
