use std::env;
use std::sync::{Arc, RwLock};

use crate::error::ValidationError;
use crate::models::{parse_address, Address};

/// Where the poll loop looks up the address to watch, once per cycle
pub trait AddressSource: Send + Sync {
    /// The raw configured value, if any
    fn raw_address(&self) -> Option<String>;

    /// Parse the configured value. Blank counts as unset.
    fn resolve(&self) -> Result<Option<Address>, ValidationError> {
        match self.raw_address() {
            Some(raw) if !raw.trim().is_empty() => parse_address(&raw).map(Some),
            _ => Ok(None),
        }
    }
}

/// Reads an environment variable on every lookup, so the watched address can
/// be changed while the process runs. Falls back to a configured address.
#[derive(Debug, Clone)]
pub struct EnvAddressSource {
    var_name: String,
    fallback: Option<String>,
}

impl EnvAddressSource {
    pub fn new(var_name: &str, fallback: Option<String>) -> Self {
        Self {
            var_name: var_name.to_string(),
            fallback,
        }
    }
}

impl AddressSource for EnvAddressSource {
    fn raw_address(&self) -> Option<String> {
        env::var(&self.var_name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.fallback.clone())
    }
}

/// An address held in memory and changeable from another handle
#[derive(Debug, Clone, Default)]
pub struct SharedAddressSource {
    value: Arc<RwLock<Option<String>>>,
}

impl SharedAddressSource {
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial.map(str::to_string))),
        }
    }

    pub fn set(&self, value: Option<&str>) {
        let mut guard = match self.value.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = value.map(str::to_string);
    }
}

impl AddressSource for SharedAddressSource {
    fn raw_address(&self) -> Option<String> {
        match self.value.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
