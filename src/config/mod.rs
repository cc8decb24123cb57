//! Engine configuration.

pub mod loader;

pub use loader::{
    load_config, load_or_default, parse_config, resolve_config_path, EngineConfig, CONFIG_ENV,
};
