//! Logging initialisation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ConfigError;

/// The `log:` section of a mapping config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "info_level")]
    pub level: String,
    /// Crate name to level, e.g. `resolverindex-evm: debug` to trace call-data recovery.
    #[serde(default)]
    pub components: HashMap<String, String>,
    #[serde(default)]
    pub json: bool,
}

fn info_level() -> String {
    Level::INFO.to_string().to_lowercase()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: info_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Reject level names `EnvFilter` would otherwise ignore.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut components: Vec<_> = self.components.iter().collect();
        components.sort();
        let levels = std::iter::once(("*", &self.level))
            .chain(components.into_iter().map(|(c, l)| (c.as_str(), l)));
        for (component, level) in levels {
            if LevelFilter::from_str(level).is_err() {
                return Err(ConfigError::InvalidLogLevel {
                    component: component.to_string(),
                    level: level.clone(),
                });
            }
        }
        Ok(())
    }

    /// `EnvFilter` directives, e.g. `"info,resolverindex_evm=debug"`.
    pub fn directives(&self) -> String {
        let mut components: Vec<_> = self.components.iter().collect();
        components.sort();
        let mut directives = self.level.clone();
        for (component, level) in components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
