use crate::error::ConfigError;
use crate::model::RepoId;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

pub fn parse_repo_list(text: &str) -> Vec<RepoId> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_string()))
        .map(RepoId::from)
        .collect()
}

pub fn load_repo_list(path: &Path) -> Result<Vec<RepoId>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::RepoListUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_repo_list(&text))
}

#[derive(Clone, Debug)]
pub struct TrackedRepos {
    path: PathBuf,
    repos: Arc<RwLock<Vec<RepoId>>>,
}

impl TrackedRepos {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let repos = load_repo_list(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            repos: Arc::new(RwLock::new(repos)),
        })
    }

    pub fn from_ids(path: &Path, repos: Vec<RepoId>) -> Self {
        Self {
            path: path.to_path_buf(),
            repos: Arc::new(RwLock::new(repos)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reload(&self) -> Result<Vec<RepoId>, ConfigError> {
        let repos = load_repo_list(&self.path)?;
        *self.repos.write().unwrap_or_else(PoisonError::into_inner) = repos.clone();
        Ok(repos)
    }

    pub fn snapshot(&self) -> Vec<RepoId> {
        self.repos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_skips_blanks_and_comments() {
        let repos = parse_repo_list("# tracked\n\n  a/b  \n#c/d\ne/f\n\t\n");
        assert_eq!(repos, vec![RepoId::from("a/b"), RepoId::from("e/f")]);
    }

    #[test]
    fn parse_keeps_first_duplicate() {
        let repos = parse_repo_list("x/y\na/b\nx/y\n");
        assert_eq!(repos, vec![RepoId::from("x/y"), RepoId::from("a/b")]);
    }

    #[test]
    fn load_missing_list_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_repo_list(&tmp.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::RepoListUnreadable { .. }));
    }

    #[test]
    fn reload_keeps_previous_list_on_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("repos.txt");
        fs::write(&path, "a/b\n").unwrap();
        let tracked = TrackedRepos::load(&path).unwrap();

        fs::write(&path, "a/b\nc/d\n").unwrap();
        assert_eq!(tracked.reload().unwrap().len(), 2);

        fs::remove_file(&path).unwrap();
        assert!(tracked.reload().is_err());
        assert_eq!(tracked.snapshot().len(), 2);
    }
}
