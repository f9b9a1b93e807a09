use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod models;
pub use models::*;

/// Default prefix for environment overrides, e.g. `SLOTBOOK__SERVER__PORT=9000`.
pub const DEFAULT_PREFIX: &str = "SLOTBOOK";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning:
/// 1. `<CONFIG_DIR>/default.{toml,yaml,json}`
/// 2. `<CONFIG_DIR>/<RUN_ENV>.{toml,yaml,json}` (`RUN_ENV` defaults to `debug`)
/// 3. Environment variables with prefix `PREFIX` (default `SLOTBOOK`) and `__` as separator.
///
/// `CONFIG_DIR` defaults to `config` relative to the working directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "Loading config: default={}, env={}, prefix={}",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables, once per process.
///
/// The file is taken from `DOTENV_OVERRIDE`, or from the first command line argument
/// when it starts with `.env`, falling back to `.env`. A missing file is not an error.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
