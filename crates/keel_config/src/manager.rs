//! JSON-file-backed cvar table
//!
//! The file is a flat object of `name -> value`. Values for cvars that have
//! not been registered yet are held aside and applied on registration, and
//! written back untouched on save so other subsystems' settings survive.

use crate::cvar::{CVarDef, CVarType, CVarValue};
use crate::cvars;
use crate::error::ConfigError;
use crate::store::ConfigStore;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Registered cvars plus an optional backing file.
#[derive(Debug, Default)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    values: BTreeMap<String, CVarValue>,
    unregistered: BTreeMap<String, CVarValue>,
}

impl ConfigManager {
    /// A store with no backing file; `save_to_file` is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory store with every client cvar registered at its default.
    pub fn with_client_cvars() -> Self {
        let mut manager = Self::new();
        manager.register_client_cvars();
        manager
    }

    /// Open the config file at `path`. A missing file is not an error; it is
    /// created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let unregistered = if path.exists() {
            read_file(&path)?
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            BTreeMap::new()
        };

        tracing::debug!("Loaded {} cvar overrides from {}", unregistered.len(), path.display());
        Ok(Self {
            path: Some(path),
            values: BTreeMap::new(),
            unregistered,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Register a cvar. A value loaded from file takes precedence over the
    /// default when its type is compatible.
    pub fn register(&mut self, name: &str, default: CVarValue) {
        let value = match self.unregistered.remove(name) {
            Some(loaded) => loaded.coerce(default.kind()).unwrap_or_else(|| {
                tracing::warn!(
                    "Ignoring config value {} for cvar '{}': expected {}",
                    loaded,
                    name,
                    default.kind()
                );
                default
            }),
            None => default,
        };
        self.values.insert(name.to_string(), value);
    }

    pub fn register_def<T: CVarType>(&mut self, def: &CVarDef<T>) {
        self.register(def.name, def.default_value());
    }

    pub fn register_client_cvars(&mut self) {
        for (name, default) in cvars::client_defaults() {
            self.register(name, default);
        }
    }

    /// Re-read the backing file, replacing registered values it mentions.
    ///
    /// Nothing changes unless the whole file parses and every registered
    /// entry has a compatible type.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let loaded = read_file(&path)?;
        let mut updates = Vec::new();
        let mut unregistered = BTreeMap::new();
        for (name, value) in loaded {
            match self.values.get(&name) {
                Some(current) => {
                    let coerced = value.coerce(current.kind()).ok_or_else(|| {
                        ConfigError::TypeMismatch {
                            name: name.clone(),
                            expected: current.kind(),
                            found: value.kind(),
                        }
                    })?;
                    updates.push((name, coerced));
                }
                None => {
                    unregistered.insert(name, value);
                }
            }
        }

        self.values.extend(updates);
        self.unregistered = unregistered;
        tracing::debug!("Reloaded config from {}", path.display());
        Ok(())
    }
}

impl ConfigStore for ConfigManager {
    fn get(&self, name: &str) -> Result<CVarValue, ConfigError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownCVar {
                name: name.to_string(),
            })
    }

    fn set(&mut self, name: &str, value: CVarValue) -> Result<(), ConfigError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownCVar {
                name: name.to_string(),
            })?;
        // the file format has no representation for inf/NaN
        if let CVarValue::Float(v) = value {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: name.to_string(),
                    value: v,
                });
            }
        }
        *slot = value
            .coerce(slot.kind())
            .ok_or_else(|| ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            })?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), ConfigError> {
        self.reload()
    }

    fn save_to_file(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            tracing::debug!("Config store has no backing file, skipping save");
            return Ok(());
        };

        let mut table = self.unregistered.clone();
        table.extend(self.values.iter().map(|(k, v)| (k.clone(), *v)));

        let json = serde_json::to_string_pretty(&table).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        // Write beside the target and rename so a failed write never truncates it.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }

        tracing::info!("Saved {} cvars to {}", table.len(), path.display());
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<BTreeMap<String, CVarValue>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
