//! Environment lookup helpers
//!
//! Configuration structs read their settings through [`EnvSource`] so tests can
//! supply a plain map instead of mutating the process environment.

use std::collections::HashMap;

/// A source of string settings keyed by variable name
pub trait EnvSource {
    /// Raw value for `key`, if set
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key` with surrounding whitespace removed; blank values count as unset
    fn var(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Value for `key`, or `default` when unset
    fn var_or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|value| (*value).to_string())
    }
}
