/// A single repository returned by the search api, held only for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub id: u64,
    pub full_name: String,
    pub description: String,
    pub language: String,
    pub owner: String,
    pub owner_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<String>,
    pub url: String,
    pub stars: u64,
    pub license: String,
}
