//! Live process environment

use std::env;

use super::traits::Environment;

/// Environment backed by the variables of the running process
///
/// Every call goes straight to `std::env`, so changes made elsewhere in the
/// process are visible on the next lookup. Variables whose name or value is
/// not valid UTF-8 are treated as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a handle to the process environment
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn name(&self) -> &str {
        "process"
    }

    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        env::var_os(key).and_then(|value| value.into_string().ok())
    }

    fn vars(&self) -> Vec<(String, String)> {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}
