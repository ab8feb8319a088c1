//! Category file discovery for WordNet dictionary directories
//!
//! A dictionary directory holds up to four data files:
//! ```text
//! dict/
//!   data.noun
//!   data.verb
//!   data.adj
//!   data.adv
//!   index.noun ...
//! ```
//! Only the `data.*` files are imported.

use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::{CATEGORY_FILE_PATTERN, DATA_FILE_PREFIX, DEFAULT_DICTIONARY_SUBDIR};
use crate::error::{Result, WordnetError};
use crate::models::Category;

/// A named data file fed to the importer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFile {
    /// Batch name handed to the sink (`noun`, `verb`, ...)
    pub name: String,
    pub path: PathBuf,
}

impl CategoryFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The conventional file for `category` inside `dict_dir`
    pub fn for_category(dict_dir: &Path, category: Category) -> Self {
        Self::new(category.short_name(), dict_dir.join(category.file_name()))
    }
}

/// Expected data files for `categories`, present or not, in the given order
pub fn category_files(dict_dir: &Path, categories: &[Category]) -> Vec<CategoryFile> {
    categories
        .iter()
        .map(|&category| CategoryFile::for_category(dict_dir, category))
        .collect()
}

/// List the categories whose data file exists in `dict_dir`
///
/// Results come back in the standard noun, verb, adj, adv order.
pub fn discover_category_files(dict_dir: &Path) -> Result<Vec<Category>> {
    if !dict_dir.is_dir() {
        return Err(WordnetError::DictionaryNotFound {
            path: dict_dir.to_path_buf(),
        });
    }

    let pattern = dict_dir.join(format!("{}*", DATA_FILE_PREFIX));
    let pattern_str = pattern.to_string_lossy();
    debug!("Searching for data files with pattern: {}", pattern_str);

    let file_pattern = category_file_regex()?;
    let entries = glob::glob(&pattern_str)
        .map_err(|e| WordnetError::configuration(format!("invalid glob pattern: {}", e)))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(captures) = file_pattern.captures(file_name)
            && let Ok(category) = captures[1].parse::<Category>()
        {
            found.push(category);
        }
    }

    let ordered: Vec<Category> = Category::all()
        .into_iter()
        .filter(|c| found.contains(c))
        .collect();
    debug!("Found {} category files in {}", ordered.len(), dict_dir.display());
    Ok(ordered)
}

/// Walk `root` for the first directory holding any category data file
pub fn find_dictionary_dir(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(WordnetError::DictionaryNotFound {
            path: root.to_path_buf(),
        });
    }

    let file_pattern = category_file_regex()?;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_data_file = entry
            .file_name()
            .to_str()
            .is_some_and(|name| file_pattern.is_match(name));
        if is_data_file && let Some(parent) = entry.path().parent() {
            debug!("Found dictionary directory: {}", parent.display());
            return Ok(parent.to_path_buf());
        }
    }

    Err(WordnetError::DictionaryNotFound {
        path: root.to_path_buf(),
    })
}

/// Conventional install location under the user data directory
pub fn default_dictionary_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(DEFAULT_DICTIONARY_SUBDIR))
}

fn category_file_regex() -> Result<Regex> {
    Regex::new(CATEGORY_FILE_PATTERN)
        .map_err(|e| WordnetError::configuration(format!("invalid file pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_category_files_keep_requested_order() {
        let files = category_files(Path::new("/dict"), &[Category::Verb, Category::Noun]);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "verb");
        assert_eq!(files[0].path, PathBuf::from("/dict/data.verb"));
        assert_eq!(files[1].name, "noun");
    }

    #[test]
    fn test_discover_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["data.adv", "data.noun", "index.noun", "data.noun.bak", "lexnames"] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let found = discover_category_files(temp_dir.path()).unwrap();
        assert_eq!(found, vec![Category::Noun, Category::Adverb]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        match discover_category_files(&missing) {
            Err(WordnetError::DictionaryNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected DictionaryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_find_dictionary_dir_walks_tree() {
        let temp_dir = TempDir::new().unwrap();
        let dict = temp_dir.path().join("WordNet-3.0").join("dict");
        fs::create_dir_all(&dict).unwrap();
        fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
        fs::write(temp_dir.path().join("docs").join("README"), "").unwrap();
        fs::write(dict.join("data.verb"), "").unwrap();

        assert_eq!(find_dictionary_dir(temp_dir.path()).unwrap(), dict);
    }

    #[test]
    fn test_find_dictionary_dir_without_data_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.noun"), "").unwrap();
        assert!(matches!(
            find_dictionary_dir(temp_dir.path()),
            Err(WordnetError::DictionaryNotFound { .. })
        ));
    }
}
