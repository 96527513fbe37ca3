use crate::api::{LanguageBytes, RepoRef};
use serde::Deserialize;

/// Entry of the repository listing. Every other field of the record is ignored.
#[derive(Deserialize, Debug)]
pub struct Repo {
    #[serde(default)]
    pub languages_url: Option<String>,
}

impl Repo {
    pub fn into_repo_ref(self) -> Option<RepoRef> {
        self.languages_url
            .filter(|url| !url.is_empty())
            .map(RepoRef::new)
    }
}

/// Language breakdown of a single repository.
pub type Languages = LanguageBytes;

#[test]
fn repo_listing_test() {
    let body = r#"[
        {"name": "a", "languages_url": "https://api.github.com/repos/octo/a/languages"},
        {"name": "b"},
        {"name": "c", "languages_url": null},
        {"name": "d", "languages_url": ""}
    ]"#;
    let repos: Vec<Repo> = serde_json::from_str(body).unwrap();
    let refs: Vec<RepoRef> = repos.into_iter().filter_map(Repo::into_repo_ref).collect();
    assert_eq!(
        refs,
        vec![RepoRef::new("https://api.github.com/repos/octo/a/languages".to_string())]
    );
}
