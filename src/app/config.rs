use anyhow::{Context, Result};
use clap::Args;
use qchess_core::engine::config::EngineConfig;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// JSON tuning file; piece values are scale factors on the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum search depth in plies
    #[arg(long, global = true)]
    pub depth: Option<u8>,

    /// Wall-clock budget per move in milliseconds
    #[arg(long = "time-ms", global = true)]
    pub time_ms: Option<u64>,

    /// Step size of the value table update
    #[arg(long, global = true)]
    pub learning_rate: Option<f64>,
}

impl EngineArgs {
    /// Defaults, then the config file, then command-line overrides.
    pub fn load(&self) -> Result<Arc<EngineConfig>> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                EngineConfig::load_from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => EngineConfig::default(),
        };

        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(time_ms) = self.time_ms {
            config.time_limit_ms = time_ms;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }

        tracing::debug!(?config, "engine configuration");
        Ok(Arc::new(config))
    }
}
