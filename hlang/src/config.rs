//! Interpreter configuration

/// Default limit on nested function and lambda calls
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10_000;

/// Default entry function
pub const DEFAULT_ENTRY: &str = "main";

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Function called by `run`
    pub entry: String,
    /// Nested calls allowed before a stack overflow error
    pub max_recursion_depth: usize,
}

impl Config {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }

    /// Set the entry function
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = name.into();
        self
    }

    /// Set the recursion limit
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.entry, "main");
        assert_eq!(config.max_recursion_depth, DEFAULT_MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_builder() {
        let config = Config::new().entry("start").max_recursion_depth(50);
        assert_eq!(config.entry, "start");
        assert_eq!(config.max_recursion_depth, 50);
    }
}
