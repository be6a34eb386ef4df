use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use toml::{map::Map, Value};
use tracing::warn;

/// Root of the cargo workspace, or the current directory when cargo cannot
/// be asked (e.g. a deployed binary).
pub fn workspace_dir() -> PathBuf {
    let located = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| {
            Path::new(stdout.trim()).parent().map(Path::to_path_buf)
        });

    match located {
        Some(dir) => dir,
        None => {
            warn!(task = "locate workspace", fallback = "current dir");
            PathBuf::from(".")
        }
    }
}

pub fn load_config<T: DeserializeOwned>(config_name: &str) -> anyhow::Result<T> {
    let path = workspace_dir().join(config_name);
    let config = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    parse_config(&config)
        .with_context(|| format!("failed to parse {}", config_name))
}

pub fn parse_config<T: DeserializeOwned>(config: &str) -> anyhow::Result<T> {
    Ok(toml::from_str::<T>(config)?)
}

pub fn load_env(secrets_name: &str) -> anyhow::Result<Map<String, Value>> {
    let workspace_dir = workspace_dir();
    let secrets = std::fs::read_to_string(workspace_dir.join(secrets_name))
        .with_context(|| format!("failed to read {}", secrets_name))?;

    toml::from_str::<Map<String, Value>>(&secrets)
        .with_context(|| format!("failed to parse {}", secrets_name))
}

/// Looks up a string secret, naming the missing key in the error.
pub fn secret<'a>(
    secrets: &'a Map<String, Value>,
    key: &str,
) -> anyhow::Result<&'a str> {
    secrets
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("{} was not found", key))
}
