//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use routecfg_core::{ModelRef, RouterRole, CONFIG_ENV_VAR};

/// Edit the provider, model and router settings of a routing config.
#[derive(Debug, Parser)]
#[command(name = "routecfg", version, about)]
pub struct Cli {
    /// Path to config file (default: ~/.config/routecfg/config.json)
    #[arg(long, global = true, env = CONFIG_ENV_VAR, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all models grouped by provider, or the providers offering MODEL
    Ls {
        /// Only show which providers offer this model id
        model: Option<String>,
    },

    /// Show the current router configuration
    Show,

    /// Create a new config with one provider backing the default router
    Init(InitArgs),

    /// Point a router at a model (<provider>,<model> or a unique <model>)
    Change {
        /// Router role: default, background, think, longContext, webSearch
        #[arg(value_parser = parse_role)]
        role: RouterRole,
        /// Model reference
        #[arg(value_parser = parse_model_ref, value_name = "MODEL")]
        model: ModelRef,
    },

    /// Remove a router binding (default cannot be removed)
    Unset {
        #[arg(value_parser = parse_role)]
        role: RouterRole,
    },

    /// Set the token threshold for the longContext router
    Threshold {
        /// Positive token count
        value: u64,
    },

    /// Add a provider or model
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Delete a provider or model
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },

    /// Add newly listed models by querying provider /v1/models endpoints
    Update {
        /// Only update this provider
        provider: Option<String>,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Provider ID
    pub provider: String,
    /// API base URL
    pub base_url: String,
    /// Model ID for the default router
    pub model: String,
    /// API key stored with the provider
    #[arg(long, default_value = "")]
    pub api_key: String,
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Subcommand)]
pub enum AddTarget {
    /// Add a new provider
    Provider {
        /// Provider ID
        id: String,
        /// API base URL
        #[arg(long)]
        base_url: String,
        /// API key
        #[arg(long, default_value = "")]
        api_key: String,
    },
    /// Add a model to a provider
    Model {
        /// Provider ID
        provider: String,
        /// Model ID
        model: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeleteTarget {
    /// Delete a provider and every router bound to its models
    Provider {
        /// Provider ID to delete
        id: String,
        /// Auto-confirm deletion
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a model (<provider>,<model> or a unique <model>)
    Model {
        #[arg(value_parser = parse_model_ref, value_name = "MODEL")]
        model: ModelRef,
        /// Auto-confirm deletion
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_role(s: &str) -> Result<RouterRole, String> {
    s.parse().map_err(|e: routecfg_core::ConfigError| e.to_string())
}

fn parse_model_ref(s: &str) -> Result<ModelRef, String> {
    s.parse().map_err(|e: routecfg_core::ConfigError| e.to_string())
}
