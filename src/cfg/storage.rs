use directories::ProjectDirs;
use std::{
    fs::OpenOptions,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("io.github", "orbit-lab", "orbit_lab"));
static CONFIG_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    PROJECT_DIRS
        .as_ref()
        .map(|dir| dir.config_dir().to_path_buf())
});

const CONFIG_FILE: &str = "config.toml";
const TEMP_CONFIG_FILE: &str = "config.toml.tmp";

fn get_table(cfg_path: &Path) -> toml::value::Table {
    let Ok(mut file) = OpenOptions::new().read(true).open(cfg_path) else {
        return toml::value::Table::new();
    };

    let mut string = String::new();
    let Ok(_) = file.read_to_string(&mut string) else {
        return toml::value::Table::new();
    };

    toml::from_str(&string).unwrap_or_default()
}

pub fn save<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<(), SaveError> {
    let cfg_dir = CONFIG_DIR.as_ref().ok_or(SaveError::NoSaveDirectory)?;
    save_in(cfg_dir, key, value)
}

pub fn load<T: for<'d> Deserialize<'d>>(key: &str) -> Result<T, LoadError> {
    let cfg_dir = CONFIG_DIR.as_ref().ok_or(LoadError::NoSaveDirectory)?;
    load_from(cfg_dir, key)
}

/// Writes `key = value` into `config.toml` inside `cfg_dir`, keeping the
/// other keys. The file is replaced atomically through a temporary file.
pub fn save_in<T: Serialize + ?Sized>(cfg_dir: &Path, key: &str, value: &T) -> Result<(), SaveError> {
    let cfg_path = cfg_dir.join(CONFIG_FILE);
    let tmp_path = cfg_dir.join(TEMP_CONFIG_FILE);

    let value = toml::Value::try_from(value).map_err(SaveError::SerializeValue)?;

    std::fs::create_dir_all(cfg_dir).map_err(SaveError::CreateConfigDir)?;

    let mut table = get_table(&cfg_path);

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(SaveError::OpenTmpFile)?;

    table.insert(key.to_string(), value);
    let table_string = toml::to_string(&table).map_err(SaveError::StringifyTable)?;

    tmp_file
        .write_all(table_string.as_bytes())
        .map_err(SaveError::Write)?;
    tmp_file.flush().map_err(SaveError::Write)?;
    drop(tmp_file);

    std::fs::rename(&tmp_path, &cfg_path).map_err(SaveError::Rename)?;

    log::debug!("saved `{key}` to {}", cfg_path.display());
    Ok(())
}

pub fn load_from<T: for<'d> Deserialize<'d>>(cfg_dir: &Path, key: &str) -> Result<T, LoadError> {
    let cfg_path = cfg_dir.join(CONFIG_FILE);
    let mut file = OpenOptions::new()
        .read(true)
        .open(&cfg_path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::NotFoundInTable,
            _ => LoadError::OpenFile(e),
        })?;

    let mut string = String::new();
    file.read_to_string(&mut string)
        .map_err(LoadError::ReadFile)?;
    drop(file);

    let mut table: toml::value::Table =
        toml::from_str(&string).map_err(LoadError::DeserializeFile)?;

    let value = table.remove(key).ok_or(LoadError::NotFoundInTable)?;
    value.try_into().map_err(LoadError::DeserializeValue)
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("No reasonable save directory was found")]
    NoSaveDirectory,
    #[error("SerializeValue: {0}")]
    SerializeValue(toml::ser::Error),
    #[error("CreateConfigDir: {0}")]
    CreateConfigDir(io::Error),
    #[error("OpenTmpFile: {0}")]
    OpenTmpFile(io::Error),
    #[error("StringifyTable: {0}")]
    StringifyTable(toml::ser::Error),
    #[error("Write: {0}")]
    Write(io::Error),
    #[error("Rename: {0}")]
    Rename(io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No reasonable save directory was found")]
    NoSaveDirectory,
    #[error("OpenFile: {0}")]
    OpenFile(io::Error),
    #[error("ReadFile: {0}")]
    ReadFile(io::Error),
    #[error("DeserializeFile: {0}")]
    DeserializeFile(toml::de::Error),
    #[error("Key not found in table")]
    NotFoundInTable,
    #[error("DeserializeValue: {0}")]
    DeserializeValue(toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::SimConfig;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "orbit_lab_storage_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_then_load_keeps_other_keys() {
        let dir = scratch_dir("keys");
        let config = SimConfig {
            max_path_points: 12,
            ..SimConfig::default()
        };

        save_in(&dir, "other", &true).unwrap();
        save_in(&dir, "simulation", &config).unwrap();

        let loaded: SimConfig = load_from(&dir, "simulation").unwrap();
        assert_eq!(loaded, config);
        let other: bool = load_from(&dir, "other").unwrap();
        assert!(other);
        assert!(!dir.join(TEMP_CONFIG_FILE).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_reads_as_missing_key() {
        let dir = scratch_dir("missing");
        let err = load_from::<SimConfig>(&dir, "simulation").unwrap_err();
        assert!(matches!(err, LoadError::NotFoundInTable));
    }
}
