//! Loads the project configuration from `quire.yaml`.

use crate::date::DateOverride;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE: &str = "quire.yaml";

fn default_posts_directory() -> PathBuf {
    PathBuf::from("content/posts")
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default = "default_posts_directory")]
    posts_directory: PathBuf,

    #[serde(default)]
    author: Option<String>,

    #[serde(default)]
    date_overrides: HashMap<String, DateOverride>,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// The directory holding the `*.md` post files.
    pub posts_directory: PathBuf,

    /// The name put in the byline of newly created posts.
    pub author: Option<String>,

    /// Curated publication dates, keyed by post identifier.
    pub date_overrides: HashMap<String, DateOverride>,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `quire.yaml` and
    /// loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(dir) => Config::from_directory(dir),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads a project file. A relative `posts_directory` is resolved against
    /// the directory containing the file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config {
                posts_directory: project_root.join(project.posts_directory),
                author: project.author,
                date_overrides: project.date_overrides,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_project_file() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            concat!(
                "posts_directory: posts\n",
                "author: Jane Doe\n",
                "date_overrides:\n",
                "  hello-world:\n",
                "    date: 2024-03-05\n",
                "    display: March 5, 2024\n",
            ),
        )?;

        let config = Config::from_project_file(&dir.path().join(PROJECT_FILE))?;
        assert_eq!(config.posts_directory, dir.path().join("posts"));
        assert_eq!(config.author.as_deref(), Some("Jane Doe"));
        assert_eq!(
            config.date_overrides.get("hello-world"),
            Some(&DateOverride {
                date: String::from("2024-03-05"),
                display: String::from("March 5, 2024"),
            })
        );
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), "{}\n")?;

        let config = Config::from_project_file(&dir.path().join(PROJECT_FILE))?;
        assert_eq!(config.posts_directory, dir.path().join("content/posts"));
        assert_eq!(config.author, None);
        assert!(config.date_overrides.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), "author: Someone\n")?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(config.author.as_deref(), Some("Someone"));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), "posts_dir: typo\n")?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }
}
