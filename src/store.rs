//! Local persistence for saved stories and the auth token
//!
//! The site keeps a small amount of state on the user's machine: the list of
//! story texts they saved and the auth token for the API. This module stores
//! both as JSON files in an XDG-compliant data directory, read on load and
//! written on each mutation. Saved stories use the same wire format as the
//! site's local storage: a JSON array of strings.

use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// File holding the saved story texts
const STORIES_FILE: &str = "saved_stories.json";
/// File holding the auth token
const TOKEN_FILE: &str = "auth_token.json";

/// Errors that can occur when reading or writing local state
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed
    #[error("local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored file held malformed JSON
    #[error("failed to parse stored data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// String-keyed local store backed by JSON files on disk
///
/// Files live in an XDG data directory (`~/.local/share/settlekit/` on
/// Linux). A missing file reads as empty state, never as an error.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory where state files are stored
    data_dir: PathBuf,
}

impl LocalStore {
    /// Creates a store in the platform data directory
    ///
    /// Returns `None` if the data directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "settlekit")?;
        let data_dir = project_dirs.data_dir().to_path_buf();
        Some(Self { data_dir })
    }

    /// Creates a store over a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the path of a state file
    fn file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Ensures the data directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Loads the saved story texts
    ///
    /// A store that was never written reads as an empty list.
    pub fn load_saved_stories(&self) -> Result<Vec<String>, StoreError> {
        let path = self.file_path(STORIES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the saved story list on disk
    pub fn store_saved_stories(&self, stories: &[String]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(stories)?;
        fs::write(self.file_path(STORIES_FILE), json)?;
        debug!(count = stories.len(), "saved story list written");
        Ok(())
    }

    /// Appends one story text to the saved list
    pub fn save_story(&self, text: &str) -> Result<(), StoreError> {
        let mut stories = self.load_saved_stories()?;
        stories.push(text.to_string());
        self.store_saved_stories(&stories)
    }

    /// Loads the auth token, if one was stored
    pub fn load_token(&self) -> Result<Option<String>, StoreError> {
        let path = self.file_path(TOKEN_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Stores the auth token, replacing any previous one
    pub fn store_token(&self, token: &str) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let json = serde_json::to_string(token)?;
        fs::write(self.file_path(TOKEN_FILE), json)?;
        Ok(())
    }
}
