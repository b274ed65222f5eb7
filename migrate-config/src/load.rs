use serde::de::DeserializeOwned;
use std::path::Path;

use crate::environment::Environment;

/// Directory containing configuration files relative to the working directory.
const CONFIGURATION_DIR: &str = "configuration";

/// Base configuration file loaded for all environments.
const BASE_CONFIG_FILE: &str = "base.yaml";

/// Prefix for environment variable configuration overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between environment variable prefix and key segments.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
///
/// Example: `APP_LEDGER__RPC__ENDPOINT` sets the `ledger.rpc.endpoint` field.
const ENV_SEPARATOR: &str = "__";

/// Loads hierarchical configuration from `./configuration`.
///
/// See [`load_config_from`] for the layering rules.
///
/// # Panics
/// Panics if the current directory cannot be determined or if `APP_ENVIRONMENT`
/// cannot be parsed.
pub fn load_config<T>() -> Result<T, config::ConfigError>
where
    T: DeserializeOwned,
{
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    load_config_from(&base_path.join(CONFIGURATION_DIR))
}

/// Loads hierarchical configuration from YAML files and environment variables.
///
/// Sources are applied in this order, later ones overriding earlier ones:
/// 1. `{configuration_directory}/base.yaml` (required)
/// 2. `{configuration_directory}/{environment}.yaml` (optional)
/// 3. Environment variables prefixed with `APP`, nested with `__`
///
/// # Panics
/// Panics if `APP_ENVIRONMENT` is set to an unsupported value.
pub fn load_config_from<T>(configuration_directory: &Path) -> Result<T, config::ConfigError>
where
    T: DeserializeOwned,
{
    let environment = Environment::load().expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{environment}.yaml");

    let environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join(BASE_CONFIG_FILE),
        ))
        // Environment files only carry overrides, a dev checkout usually has none.
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // E.g. `APP_CHECKPOINT__PATH=/var/lib/migrator/pools.json` sets
        // `MigratorConfig { checkpoint: CheckpointConfig { path } }`.
        .add_source(environment_source)
        .build()?;

    settings.try_deserialize::<T>()
}
