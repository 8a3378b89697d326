//! 命令行参数定义

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::AppConfig;

/// Look up domain registration data (RDAP) and render it as a text report.
#[derive(Debug, Parser)]
#[command(name = "rdap-viewer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Look up domain registration data (RDAP) and render it as a text report")]
pub struct Cli {
    /// Config file (defaults to <config dir>/rdap-viewer/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up one domain and print the report
    Lookup(LookupArgs),
    /// Read domains from stdin, one per line (`:help` for commands)
    Interactive(ConnectionArgs),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Domain name, e.g. example.com
    pub domain: String,

    /// Print the raw response as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Save the output under its suggested name in the output directory
    #[arg(short, long)]
    pub save: bool,

    /// Save the output to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Per-invocation overrides of config file values.
#[derive(Debug, Default, Args)]
pub struct ConnectionArgs {
    /// Lookup service base URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Text printed for absent fields
    #[arg(long, value_name = "TEXT")]
    pub placeholder: Option<String>,

    /// Directory for saved reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(placeholder) = &self.placeholder {
            config.placeholder.clone_from(placeholder);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
