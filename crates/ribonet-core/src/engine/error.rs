use thiserror::Error;

use super::config::{ConfigError, ConfigLoadError};
use crate::core::scoring::mixture::ModelLoadError;
use crate::core::topology::registry::TopologyLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid pipeline configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to load pipeline configuration: {source}")]
    ConfigLoad {
        #[from]
        source: ConfigLoadError,
    },

    #[error("Failed to load atom-set registry: {source}")]
    Topology {
        #[from]
        source: TopologyLoadError,
    },

    #[error("Failed to load mixture model: {source}")]
    Model {
        #[from]
        source: ModelLoadError,
    },
}
