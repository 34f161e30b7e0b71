use crate::config::toml_config::LibraryConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "library-lending")]
#[command(about = "Library catalog, membership and lending service")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "library.toml")]
    pub config: String,

    /// Override the bind address from the config file
    #[arg(long)]
    pub bind: Option<String>,

    /// Override the snapshot path from the config file
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Loads the config file, falling back to defaults when it does not
    /// exist, then applies command-line overrides.
    pub fn load_config(&self) -> Result<LibraryConfig> {
        let mut config = if Path::new(&self.config).exists() {
            LibraryConfig::from_file(&self.config)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", self.config);
            LibraryConfig::default()
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(snapshot) = &self.snapshot {
            config.store.snapshot_path = Some(snapshot.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_defaults() {
        let args = CliArgs::parse_from([
            "library-lending",
            "--config",
            "/definitely/not/here.toml",
            "--bind",
            "127.0.0.1:9999",
            "--snapshot",
            "/tmp/library.json",
        ]);

        let config = args.load_config().unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9999");
        assert_eq!(config.snapshot_path(), Some("/tmp/library.json"));
        assert_eq!(config.cache.max_entries, 100);
    }
}
