// Startup configuration.
//
// Priority for the host setting: CLI flag > HOTELSQL_* environment >
// ./hotelsql.toml > default. The connection coordinates themselves are
// positional arguments; a missing required argument makes clap print the
// usage line and exit before any connection attempt.

use std::path::Path;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "hotelsql.toml";

#[derive(Parser, Debug)]
#[command(name = "hotelsql")]
#[command(about = "Interactive console for a hotel management database", long_about = None)]
pub struct Args {
    /// Database name
    pub dbname: String,

    /// Server port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Password (empty when omitted)
    #[arg(default_value = "")]
    pub password: String,

    /// Server host (overrides environment and config file)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Render result sets as a grid instead of tab-delimited lines
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Deserialize)]
struct LayeredSettings {
    #[serde(default = "default_host")]
    host: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub pretty: bool,
}

impl AppConfig {
    pub fn load(args: &Args) -> Self {
        let mut builder = Config::builder();
        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE));
        }
        builder = builder.add_source(Environment::with_prefix("HOTELSQL"));

        let layered_host = builder
            .build()
            .ok()
            .and_then(|c| c.try_deserialize::<LayeredSettings>().ok())
            .map_or_else(default_host, |s| s.host);

        Self {
            host: args.host.clone().unwrap_or(layered_host),
            port: args.port,
            dbname: args.dbname.clone(),
            user: args.user.clone(),
            password: args.password.clone(),
            pretty: args.pretty,
        }
    }
}
