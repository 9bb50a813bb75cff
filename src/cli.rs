use clap::Parser;

use crate::config::AppConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug, Default)]
#[command(name = "address-monitor")]
#[command(about = "Watch one account for balance changes and transactions via JSON-RPC")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint, overrides RPC_URL
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Seconds between poll cycles, overrides POLL_INTERVAL
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Address watched when the ADDRESS variable is unset
    #[arg(long)]
    pub address: Option<String>,

    /// TOML configuration file, overrides CONFIG_FILE
    #[arg(long)]
    pub config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub sample_config: bool,
}

impl Cli {
    /// Load file and environment configuration, then apply flags on top
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load_from_file()?,
        };
        config.apply_env_overrides()?;
        self.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc.endpoint = rpc_url.clone();
        }
        if let Some(interval) = self.poll_interval {
            config.monitor.poll_interval_seconds = interval;
        }
        if let Some(address) = &self.address {
            config.monitor.address = Some(address.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
