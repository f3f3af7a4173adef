use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::ambari::types::{ConnectionParams, Protocol, Secret};
use crate::config::Config;

/// ambari-facts - Ansible helpers for Ambari-managed Hadoop clusters
#[derive(Parser, Debug)]
#[command(name = "ambari-facts", version, about)]
pub struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run as the ambari_component_facts Ansible binary module
    Module {
        /// JSON argument file written by Ansible
        args_file: PathBuf,
    },

    /// Gather the cluster configuration from Ambari as facts
    Facts(FactsArgs),

    /// Run a registered filter over a local file
    Filter {
        /// Filter name, e.g. get_all_hosts
        name: String,
        /// File to read
        file: PathBuf,
    },

    /// List host names from an unbound resolver config (get_all_hosts)
    Hosts {
        /// Resolver config file
        file: PathBuf,
    },

    /// List registered filters
    Filters,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FactsArgs {
    /// Ambari web server protocol
    #[arg(long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Ambari web server host
    #[arg(long)]
    pub host: Option<String>,

    /// Ambari web server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path prepended to every API call (leading slash, no trailing slash)
    #[arg(long)]
    pub context_path: Option<String>,

    /// Ambari user
    #[arg(short, long)]
    pub username: Option<String>,

    /// Ambari password
    #[arg(long, env = "AMBARI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Cluster name in Ambari
    #[arg(short, long)]
    pub cluster_name: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout_sec: Option<u64>,
}

impl FactsArgs {
    /// Merge: CLI > config > defaults. Mandatory fields left unset stay
    /// empty and are rejected by `ConnectionParams::validate`.
    pub fn resolve(self, config: &Config) -> ConnectionParams {
        ConnectionParams {
            protocol: self.protocol.unwrap_or(config.protocol),
            host: self.host.unwrap_or_else(|| config.host.clone()),
            port: self.port.or(config.port).unwrap_or(0),
            context_path: self
                .context_path
                .unwrap_or_else(|| config.context_path.clone()),
            username: self
                .username
                .or_else(|| config.username.clone())
                .unwrap_or_default(),
            password: self.password.map(Secret::new).unwrap_or_default(),
            cluster_name: self
                .cluster_name
                .or_else(|| config.cluster_name.clone())
                .unwrap_or_default(),
            timeout_sec: self.timeout_sec.unwrap_or(config.timeout_sec),
        }
    }
}
