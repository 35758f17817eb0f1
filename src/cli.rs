//! Command-line interface parsing
//!
//! This module handles parsing of CLI arguments using clap: one subcommand per
//! resource kind plus local story management, with global flags for the API
//! base URL, auth token, and output limit.

use clap::{Parser, Subcommand};

use crate::api::AuthTokens;
use crate::config::ClientConfig;

/// Community resources for newcomers: services, stories, and migration updates
#[derive(Parser, Debug)]
#[command(name = "settlekit")]
#[command(about = "Browse newcomer community resources from the terminal")]
#[command(version)]
pub struct Cli {
    /// Base URL of the community resource API
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token for authenticated requests (overrides the stored token)
    #[arg(long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Show at most this many items
    #[arg(long, value_name = "N", global = true)]
    pub limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List support service locations
    Services,
    /// List community stories
    Stories,
    /// List shared settlement experiences
    Experiences,
    /// List migration updates
    Migration,
    /// Fetch all resource kinds at once
    Overview,
    /// Save a story text to local storage
    SaveStory {
        /// The story text to save
        text: String,
    },
    /// List locally saved stories
    SavedStories,
}

impl Cli {
    /// Derives the client configuration, applying CLI overrides to defaults
    pub fn to_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }

    /// Resolves the auth tokens for this run
    ///
    /// A token given on the command line wins over one loaded from local
    /// storage; with neither, requests go out unauthenticated.
    pub fn auth_tokens(&self, stored_token: Option<String>) -> AuthTokens {
        match self.token.clone().or(stored_token) {
            Some(token) => AuthTokens::bearer(token),
            None => AuthTokens::default(),
        }
    }
}
