//! Environment trait

/// Read access to a mapping of environment variables
///
/// Values are read fresh on every call. Implementations must not cache,
/// since the engine relies on environment changes being visible on the
/// very next lookup.
///
/// # Example
///
/// ```
/// use envplus::environment::{Environment, MemoryEnvironment};
///
/// let env = MemoryEnvironment::new();
/// env.set("HOST", "localhost");
/// assert_eq!(env.get("HOST"), Some("localhost".to_string()));
/// ```
pub trait Environment: Send + Sync {
    /// Human-readable name of this environment
    fn name(&self) -> &str;

    /// Look up a single variable
    ///
    /// An empty value is still a present value.
    fn get(&self, key: &str) -> Option<String>;

    /// Snapshot every variable currently visible
    fn vars(&self) -> Vec<(String, String)>;

    /// Check if a variable is set
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
