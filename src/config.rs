use crate::error::{CollectorError, Result};
use crate::types::config::CollectorConfig;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub const DEFAULT_CONFIG_FILE: &str = "orgpulse.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".orgpulse/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/orgpulse/config.toml";

pub fn load_config(root: &Path) -> Result<CollectorConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<CollectorConfig> {
    let mut merged = Table::new();
    for layer in config_layers(root, global_path) {
        overlay(&mut merged, read_layer(&layer)?);
    }

    let cfg: CollectorConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| CollectorError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Existing config files, lowest precedence first.
fn config_layers(root: &Path, global_path: Option<&Path>) -> Vec<PathBuf> {
    global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_LOCAL_FILE)])
        .filter(|path| path.is_file())
        .collect()
}

fn read_layer(path: &Path) -> Result<Table> {
    tracing::debug!(path = %path.display(), "reading config layer");
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<Table>()
        .map_err(|e| CollectorError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Later layers win key by key; nested tables merge instead of replacing.
fn overlay(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        match value {
            Value::Table(nested) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => overlay(existing, nested),
                _ => {
                    base.insert(key, Value::Table(nested));
                }
            },
            scalar => {
                base.insert(key, scalar);
            }
        }
    }
}
