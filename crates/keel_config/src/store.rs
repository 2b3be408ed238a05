//! The key-value seam between settings UIs and persisted configuration

use crate::cvar::{CVarDef, CVarType, CVarValue};
use crate::error::ConfigError;

/// A store of named cvars.
///
/// `set` only changes the in-memory value; nothing reaches disk until
/// `save_to_file` is called. Implementations are not expected to be shared
/// across threads: callers serialize access.
pub trait ConfigStore {
    fn get(&self, name: &str) -> Result<CVarValue, ConfigError>;

    fn set(&mut self, name: &str, value: CVarValue) -> Result<(), ConfigError>;

    /// Pick up changes made to the backing storage by someone else.
    /// Stores without one have nothing to do.
    fn refresh(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn save_to_file(&mut self) -> Result<(), ConfigError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &mut S {
    fn get(&self, name: &str) -> Result<CVarValue, ConfigError> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: CVarValue) -> Result<(), ConfigError> {
        (**self).set(name, value)
    }

    fn refresh(&mut self) -> Result<(), ConfigError> {
        (**self).refresh()
    }

    fn save_to_file(&mut self) -> Result<(), ConfigError> {
        (**self).save_to_file()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    fn get(&self, name: &str) -> Result<CVarValue, ConfigError> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: CVarValue) -> Result<(), ConfigError> {
        (**self).set(name, value)
    }

    fn refresh(&mut self) -> Result<(), ConfigError> {
        (**self).refresh()
    }

    fn save_to_file(&mut self) -> Result<(), ConfigError> {
        (**self).save_to_file()
    }
}

/// Typed access through a `CVarDef`.
pub trait ConfigStoreExt: ConfigStore {
    fn get_cvar<T: CVarType>(&self, def: &CVarDef<T>) -> Result<T, ConfigError> {
        let value = self.get(def.name)?;
        T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            name: def.name.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    fn set_cvar<T: CVarType>(&mut self, def: &CVarDef<T>, value: T) -> Result<(), ConfigError> {
        self.set(def.name, value.into_value())
    }
}

impl<S: ConfigStore + ?Sized> ConfigStoreExt for S {}
