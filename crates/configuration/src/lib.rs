use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalyticsSettings, Config, DemandSettings, InvestmentSettings, LogFormat, LoggingSettings,
};

/// Prefix of environment variables that override file settings,
/// e.g. `VITRINA__ANALYTICS__COMPARE_BY_TYPE=false`.
pub const ENV_PREFIX: &str = "VITRINA";

/// Loads the application configuration.
///
/// Sources are layered from lowest to highest precedence: the built-in
/// defaults, the optional TOML file at `path`, then `VITRINA__*` environment
/// variables. The merged result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        // A missing file is fine: defaults and the environment still apply.
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
