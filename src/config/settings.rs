use crate::error::{ConfigError, Result};
use log::{debug, error};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub static GLOBAL_SETTINGS: Lazy<Settings> = Lazy::new(Settings::new);

static DEFAULT_WORK_DIR: &str = "generated";
static DEFAULT_PLUGINS: &str = "account_by_key account_by_key_api condenser_api database_api";

pub const NODE_EXECUTABLE: &str = "hived";
pub const WALLET_EXECUTABLE: &str = "cli_wallet";
pub const DEV_KEY_EXECUTABLE: &str = "get_dev_key";

const NODE_BINARY_KEY: &str = "HIVED_PATH";

/// Executables the toolkit can locate: (name, environment variable)
const EXECUTABLES: [(&str, &str); 3] = [
    (NODE_EXECUTABLE, NODE_BINARY_KEY),
    (WALLET_EXECUTABLE, "CLI_WALLET_PATH"),
    (DEV_KEY_EXECUTABLE, "GET_DEV_KEY_PATH"),
];

const WORK_DIR_KEY: &str = "TESTKIT_WORK_DIR";
const PLUGINS_KEY: &str = "TESTKIT_PLUGINS";

/// Optional TOML overlay, e.g. `testkit.toml`
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    node_binary: Option<String>,
    cli_wallet: Option<String>,
    get_dev_key: Option<String>,
    work_dir: Option<String>,
    default_plugins: Option<Vec<String>>,
}

/// Toolkit runtime settings (executable paths, output directory, plugin set)
pub struct Settings {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Settings from the process environment
    pub fn new() -> Settings {
        Self::from_vars(env::vars())
    }

    /// Settings from explicit variables; unknown names are ignored
    pub fn from_vars<I>(vars: I) -> Settings
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        // an executable not given by path is looked up on PATH by its name
        for (name, key) in EXECUTABLES {
            map.insert(key.to_string(), name.to_string());
        }
        map.insert(WORK_DIR_KEY.to_string(), DEFAULT_WORK_DIR.to_string());
        map.insert(PLUGINS_KEY.to_string(), DEFAULT_PLUGINS.to_string());

        for (key, value) in vars {
            if map.contains_key(&key) {
                map.insert(key, value);
            }
        }

        Settings {
            inner: RwLock::new(map),
        }
    }

    /// Overlay values from a TOML settings file
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        let file: SettingsFile = toml::from_str(&content)?;
        debug!("Loaded settings file {}", path.display());

        let paths = [
            (NODE_EXECUTABLE, file.node_binary),
            (WALLET_EXECUTABLE, file.cli_wallet),
            (DEV_KEY_EXECUTABLE, file.get_dev_key),
        ];
        for (name, path) in paths {
            if let Some(path) = path {
                self.set_path_of(name, path)?;
            }
        }
        if let Some(dir) = file.work_dir {
            self.set(WORK_DIR_KEY, dir);
        }
        if let Some(plugins) = file.default_plugins {
            self.set(PLUGINS_KEY, plugins.join(" "));
        }
        Ok(())
    }

    /// Path of a known executable, e.g. `hived` or `cli_wallet`
    pub fn get_path_of(&self, name: &str) -> Result<PathBuf> {
        let key = executable_key(name)?;
        Ok(PathBuf::from(self.get(key).unwrap_or_else(|| name.to_string())))
    }

    pub fn set_path_of(&self, name: &str, path: String) -> Result<()> {
        let key = executable_key(name)?;
        self.set(key, path);
        Ok(())
    }

    pub fn get_node_binary(&self) -> PathBuf {
        PathBuf::from(self.get(NODE_BINARY_KEY).unwrap_or_else(|| NODE_EXECUTABLE.to_string()))
    }

    pub fn set_node_binary(&self, path: String) {
        self.set(NODE_BINARY_KEY, path);
    }

    pub fn get_work_dir(&self) -> PathBuf {
        PathBuf::from(self.get(WORK_DIR_KEY).unwrap_or_else(|| DEFAULT_WORK_DIR.to_string()))
    }

    pub fn set_work_dir(&self, dir: String) {
        self.set(WORK_DIR_KEY, dir);
    }

    /// Plugins every generated node config enables
    pub fn get_default_plugins(&self) -> Vec<String> {
        self.get(PLUGINS_KEY)
            .unwrap_or_else(|| DEFAULT_PLUGINS.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn set_default_plugins(&self, plugins: &[String]) {
        self.set(PLUGINS_KEY, plugins.join(" "));
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.inner.read() {
            Ok(inner) => inner.get(key).cloned(),
            Err(_) => {
                error!("Failed to acquire read lock on settings");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        match self.inner.write() {
            Ok(mut inner) => {
                inner.insert(key.to_string(), value);
            }
            Err(_) => {
                error!("Failed to acquire write lock on settings");
            }
        }
    }
}

fn executable_key(name: &str) -> Result<&'static str> {
    EXECUTABLES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, key)| *key)
        .ok_or_else(|| {
            ConfigError::NotSupported(format!(
                "Executable {name} is not supported. Valid options: {}",
                EXECUTABLES.map(|(known, _)| known).join(", ")
            ))
        })
}
