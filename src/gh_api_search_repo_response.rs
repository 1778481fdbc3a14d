use std::collections::HashSet;

use crate::repo::Repo;

#[derive(serde::Deserialize, Debug)]
pub(crate) struct Owner {
    pub(crate) login: String,
    pub(crate) html_url: String,
}

#[derive(serde::Deserialize, Debug)]
pub(crate) struct License {
    pub(crate) spdx_id: Option<String>,
    pub(crate) name: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
pub(crate) struct Item {
    pub(crate) id: u64,
    pub(crate) full_name: String,
    pub(crate) description: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) owner: Owner,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    #[serde(default)]
    pub(crate) topics: Vec<String>,
    pub(crate) html_url: String,
    #[serde(rename = "stargazers_count")]
    pub(crate) stars: u64,
    pub(crate) license: Option<License>,
}

#[derive(serde::Deserialize, Debug)]
pub(crate) struct GetRepoResponse {
    #[serde(rename = "total_count")]
    pub(crate) len: u64,
    #[serde(default)]
    pub(crate) incomplete_results: bool,
    #[serde(rename = "items")]
    pub(crate) repositories: Vec<Item>,
}

/// Body github sends along with a non 2xx status.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct ErrorResponse {
    pub(crate) message: String,
}

impl License {
    // "NOASSERTION" is what github reports for licenses it couldn't classify
    fn identifier(self) -> String {
        match self.spdx_id {
            Some(id) if !id.is_empty() && id != "NOASSERTION" => id,
            _ => self.name.unwrap_or_default(),
        }
    }
}

impl From<Item> for Repo {
    fn from(item: Item) -> Self {
        Repo {
            id: item.id,
            full_name: item.full_name,
            description: item.description.unwrap_or_default(),
            language: item.language.unwrap_or_default(),
            owner: item.owner.login,
            owner_url: item.owner.html_url,
            created_at: item.created_at,
            updated_at: item.updated_at,
            tags: item.topics,
            url: item.html_url,
            stars: item.stars,
            license: item.license.map(License::identifier).unwrap_or_default(),
        }
    }
}

impl GetRepoResponse {
    /// Converts the response items into repos, keeping only the first
    /// occurrence of every id.
    pub(crate) fn into_repos(self) -> Vec<Repo> {
        let mut seen = HashSet::new();
        let mut repos = Vec::with_capacity(self.repositories.len());
        for item in self.repositories {
            if !seen.insert(item.id) {
                warn!("Duplicate repo id {} ({}), skipping", item.id, item.full_name);
                continue;
            }
            repos.push(Repo::from(item));
        }
        repos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VUE_CORE: &str = r#"{
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "id": 137078487,
                "full_name": "vuejs/core",
                "description": "🖖 Vue.js is a progressive, incrementally-adoptable JavaScript framework for building UI on the web.",
                "language": "TypeScript",
                "owner": { "login": "vuejs", "html_url": "https://github.com/vuejs", "id": 6128107 },
                "created_at": "2018-06-12T13:49:36Z",
                "updated_at": "2024-05-01T08:12:00Z",
                "topics": ["vue", "framework"],
                "html_url": "https://github.com/vuejs/core",
                "stargazers_count": 45000,
                "forks_count": 8000,
                "license": { "key": "mit", "name": "MIT License", "spdx_id": "MIT" }
            },
            {
                "id": 11730342,
                "full_name": "vuejs/vue",
                "description": null,
                "language": null,
                "owner": { "login": "vuejs", "html_url": "https://github.com/vuejs" },
                "created_at": "2013-07-29T03:24:51Z",
                "updated_at": "2024-05-01T08:00:00Z",
                "html_url": "https://github.com/vuejs/vue",
                "stargazers_count": 207000,
                "license": null
            }
        ]
    }"#;

    #[test]
    fn decodes_search_response_into_repos() {
        let response: GetRepoResponse = serde_json::from_str(VUE_CORE).unwrap();
        assert_eq!(response.len, 2);
        assert!(!response.incomplete_results);

        let repos = response.into_repos();
        assert_eq!(repos.len(), 2);

        let core = &repos[0];
        assert_eq!(core.id, 137078487);
        assert_eq!(core.full_name, "vuejs/core");
        assert!(core.description.contains("Vue.js"));
        assert_eq!(core.owner, "vuejs");
        assert_eq!(core.owner_url, "https://github.com/vuejs");
        assert_eq!(core.tags, vec!["vue", "framework"]);
        assert_eq!(core.url, "https://github.com/vuejs/core");
        assert_eq!(core.stars, 45000);
        assert_eq!(core.license, "MIT");
    }

    #[test]
    fn missing_optional_fields_become_empty() {
        let repos = serde_json::from_str::<GetRepoResponse>(VUE_CORE)
            .unwrap()
            .into_repos();
        let vue = &repos[1];
        assert_eq!(vue.description, "");
        assert_eq!(vue.language, "");
        assert_eq!(vue.license, "");
        assert!(vue.tags.is_empty());
    }

    #[test]
    fn unclassified_license_falls_back_to_name() {
        let license = License {
            spdx_id: Some("NOASSERTION".to_string()),
            name: Some("Other".to_string()),
        };
        assert_eq!(license.identifier(), "Other");
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let body = r#"{
            "total_count": 3,
            "items": [
                { "id": 1, "full_name": "a/first", "owner": { "login": "a", "html_url": "u" },
                  "created_at": "", "updated_at": "", "html_url": "x", "stargazers_count": 1 },
                { "id": 2, "full_name": "b/second", "owner": { "login": "b", "html_url": "u" },
                  "created_at": "", "updated_at": "", "html_url": "y", "stargazers_count": 2 },
                { "id": 1, "full_name": "a/dupe", "owner": { "login": "a", "html_url": "u" },
                  "created_at": "", "updated_at": "", "html_url": "z", "stargazers_count": 3 }
            ]
        }"#;
        let repos = serde_json::from_str::<GetRepoResponse>(body)
            .unwrap()
            .into_repos();
        let names: Vec<&str> = repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["a/first", "b/second"]);
    }
}
